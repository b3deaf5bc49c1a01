use crate::store::{self, DataDir};
use crate::tower::tower::Tower;
use chrono::{NaiveDate, NaiveDateTime};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

pub const PLANS: &str = "voo,origem,destino,etd,eta,aeronave,tipo,prioridade,pista_pref\n\
    LA123,SBSP,SBRJ,08:15,09:05,A320,NORMAL,5,10/28\n\
    GL456,SBRJ,SBSP,08:40,09:30,B737,NORMAL,3,10/28\n\
    AZ789,SBKP,SBSV,09:10,11:00,A320,EMERGENCIA,9,01/19\n\
    TM221,SBSP,SBPA,10:05,11:20,AT72,NORMAL,1,10/28\n";

pub const PILOTS: &str = "matricula,nome,habilitacao,validade\n\
    P-1001,Carlos Andrade,A320,2099-01-01\n\
    P-1002,Marina Souza,B737,2099-01-01\n\
    P-1003,Joao Pires,AT72,2020-01-10\n";

pub const RUNWAYS: &str = "10/28, ABERTA\n01/19, FECHADA\n";
pub const METAR_CLEAR: &str = "METAR SBSP 061200Z 24008KT VIS 10KM\n";
pub const METAR_LOW: &str = "METAR SBSP 061200Z 24008KT VIS 5KM\n";
pub const NOTAM_NONE: &str = "AVISO GERAL SEM RESTRICOES\n";
pub const FLEET: &str = "prefixo,modelo,base\nPR-ABC,A320,SBSP\n";

pub fn write_dados(base: &Path, name: &str, contents: &str) {
    let path = base.join("dados").join(name);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

/// Complete data tree: two runways (10/28 open, 01/19 closed), clear
/// weather, no active NOTAM, three flights with valid pilots and one
/// (TM221) whose only rating expired years ago.
pub fn fixture() -> (TempDir, Tower) {
    let tmp = tempfile::tempdir().unwrap();
    write_dados(tmp.path(), store::FLIGHT_PLANS, PLANS);
    write_dados(tmp.path(), store::PILOTS, PILOTS);
    write_dados(tmp.path(), store::RUNWAYS, RUNWAYS);
    write_dados(tmp.path(), store::METAR, METAR_CLEAR);
    write_dados(tmp.path(), store::NOTAM, NOTAM_NONE);
    write_dados(tmp.path(), store::FLEET, FLEET);
    let tower = Tower::open(DataDir::new(tmp.path()));
    (tmp, tower)
}

pub fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 8, 6)
        .unwrap()
        .and_hms_opt(h, m, s)
        .unwrap()
}
