use crate::error::TowerError;
use crate::flight::{OperationClass, OperationKind};
use crate::queue::QueueEntry;
use crate::store::DataDir;
use crate::tower::tower::{Authorization, Tower};
use chrono::Local;
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::{Context, Editor, Helper, Highlighter, Hinter, Validator};
use std::cmp::Reverse;
use std::path::PathBuf;
use tabled::settings::Style;

mod capacity;
mod error;
mod flight;
mod journal;
mod pilot;
mod queue;
mod runway;
mod sources;
mod store;
mod time;
mod tower;
mod weather;

#[derive(Parser)]
#[command(
    name = "torre",
    about = "Torre de controle: sequenciamento de decolagens e pousos",
    version
)]
struct Args {
    /// Diretório base com dados/, logs/ e relatorios/
    #[arg(short, long, value_name = "DIR", global = true, default_value = "aero70")]
    base: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Valida os arquivos de referência e prepara as filas
    ImportarDados,
    /// Lista os planos de voo com ordenação
    Listar {
        #[arg(long, value_enum, default_value = "voo")]
        por: SortKey,
    },
    /// Enfileira um voo para decolagem ou pouso
    #[command(alias = "enqueue")]
    Enfileirar {
        #[arg(value_enum)]
        operacao: OperationKind,
        #[arg(long)]
        voo: String,
    },
    /// Autoriza a próxima operação da fila em uma pista
    Autorizar {
        #[arg(value_enum)]
        operacao: OperationKind,
        #[arg(long)]
        pista: String,
    },
    /// Mostra pistas e filas
    Status {
        /// Reordena a visão das filas por prioridade (não altera a fila)
        #[arg(long)]
        por_prioridade: bool,
    },
    /// Gera o sumário do turno
    Relatorio,
    /// Console interativo com autocompletar
    Console,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SortKey {
    Voo,
    Etd,
    Tipo,
    Prioridade,
}

impl SortKey {
    fn from_token(token: &str) -> Option<SortKey> {
        match token {
            "voo" => Some(SortKey::Voo),
            "etd" => Some(SortKey::Etd),
            "tipo" => Some(SortKey::Tipo),
            "prioridade" => Some(SortKey::Prioridade),
            _ => None,
        }
    }
}

impl ValueEnum for OperationKind {
    fn value_variants<'a>() -> &'a [Self] {
        &OperationKind::ALL
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        Some(clap::builder::PossibleValue::new(match self {
            OperationKind::Decolagem => "decolagem",
            OperationKind::Pouso => "pouso",
        }))
    }
}

#[derive(Helper, Hinter, Highlighter, Validator)]
pub struct CompleteHelper {
    pub commands: Vec<String>,
}

impl Completer for CompleteHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        _pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let mut candidates = Vec::new();

        for cmd in &self.commands {
            if cmd.starts_with(line) {
                candidates.push(Pair {
                    display: cmd.clone(),
                    replacement: format!("{} ", cmd),
                });
            }
        }

        Ok((0, candidates))
    }
}

fn main() {
    init_tracing();
    let args = Args::parse();
    let tower = Tower::open(DataDir::new(args.base.clone()));

    if let Err(err) = execute(&tower, &args.command) {
        report_error(&err);
        std::process::exit(1);
    }
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("torre=warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn report_error(err: &TowerError) {
    let prefix = if err.is_denial() { "Negado:" } else { "Erro:" };
    println!("{} {}", prefix.red(), err);
}

fn execute(tower: &Tower, command: &Command) -> Result<(), TowerError> {
    match command {
        Command::ImportarDados => {
            tower.check_data()?;
            println!("Importação validada. Filas prontas para uso.");
            Ok(())
        }
        Command::Listar { por } => listar(tower, *por),
        Command::Enfileirar { operacao, voo } => {
            let result = tower.enqueue(voo, *operacao, Local::now().naive_local())?;
            println!("Voo {} enviado para fila de {}", result.flight, result.kind);
            Ok(())
        }
        Command::Autorizar { operacao, pista } => {
            match tower.authorize(*operacao, pista, Local::now().naive_local())? {
                Authorization::Cleared { entry, runway, kind } => {
                    println!(
                        "{} {} do voo {} na pista {}",
                        "AUTORIZADO:".green(),
                        kind,
                        entry.flight,
                        runway
                    );
                }
                Authorization::QueueEmpty { kind } => {
                    println!("Fila de {kind} vazia");
                }
            }
            Ok(())
        }
        Command::Status { por_prioridade } => status(tower, *por_prioridade),
        Command::Relatorio => {
            let path = tower.write_report(Local::now().naive_local())?;
            println!("Relatório gerado em {}", path.display());
            Ok(())
        }
        Command::Console => console(tower),
    }
}

fn listar(tower: &Tower, por: SortKey) -> Result<(), TowerError> {
    let mut plans = tower.sources().flight_plans()?;
    match por {
        SortKey::Voo => plans.sort_by(|a, b| a.id.cmp(&b.id)),
        SortKey::Etd => plans.sort_by_key(|p| p.etd),
        SortKey::Tipo => plans.sort_by_key(|p| p.class.to_string()),
        // emergências primeiro, depois prioridade decrescente, depois etd
        SortKey::Prioridade => plans
            .sort_by_key(|p| (p.class != OperationClass::Emergencia, Reverse(p.priority), p.etd)),
    }

    if plans.is_empty() {
        println!("Nenhum plano de voo encontrado.");
        return Ok(());
    }
    let mut table = tabled::Table::new(&plans);
    table.with(Style::rounded());
    table.with(tabled::settings::Alignment::left());
    println!("{}", table);
    Ok(())
}

fn status(tower: &Tower, por_prioridade: bool) -> Result<(), TowerError> {
    let status = tower.status()?;
    println!("Status da torre");
    let pistas = status
        .runways
        .iter()
        .map(|(id, condition)| format!("{id}:{condition}"))
        .collect::<Vec<_>>()
        .join(", ");
    println!("- Pistas: {pistas}");
    print_queue("decolagem", &status.departures, por_prioridade);
    print_queue("pouso", &status.arrivals, por_prioridade);
    Ok(())
}

fn print_queue(label: &str, entries: &[QueueEntry], por_prioridade: bool) {
    println!("- Fila de {label}: {} itens", entries.len());
    let view = if por_prioridade {
        queue::by_priority(entries)
    } else {
        entries.to_vec()
    };
    for entry in view.iter().take(3) {
        println!(
            "  • {} {} prio={}",
            entry.flight,
            entry.enqueued_at.format("%H:%M"),
            entry.priority
        );
    }
}

fn parse_kind(token: &str) -> Option<OperationKind> {
    match token {
        "decolagem" => Some(OperationKind::Decolagem),
        "pouso" => Some(OperationKind::Pouso),
        _ => None,
    }
}

fn to_tower_err(err: ReadlineError) -> TowerError {
    TowerError::Io(std::io::Error::other(err))
}

fn console(tower: &Tower) -> Result<(), TowerError> {
    println!("Torre em modo console. 'help' lista os comandos.");

    let config = rustyline::Config::builder()
        .history_ignore_space(true)
        .completion_type(rustyline::CompletionType::List)
        .build();

    let helper = CompleteHelper {
        commands: vec![
            "importar-dados".to_string(),
            "listar".to_string(),
            "enfileirar".to_string(),
            "autorizar".to_string(),
            "status".to_string(),
            "relatorio".to_string(),
            "help".to_string(),
            "exit".to_string(),
        ],
    };

    let mut rl = Editor::with_config(config).map_err(to_tower_err)?;
    rl.set_helper(Some(helper));

    loop {
        match rl.readline(">> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                rl.add_history_entry(trimmed).map_err(to_tower_err)?;

                let parts: Vec<&str> = trimmed.split_whitespace().collect();
                match parts[0] {
                    "importar-dados" => run_console(tower, Command::ImportarDados),
                    "listar" => {
                        let por = parts
                            .get(1)
                            .and_then(|s| SortKey::from_token(s))
                            .unwrap_or(SortKey::Voo);
                        run_console(tower, Command::Listar { por });
                    }
                    "enfileirar" => {
                        match (parts.get(1).and_then(|s| parse_kind(s)), parts.get(2)) {
                            (Some(operacao), Some(voo)) => run_console(
                                tower,
                                Command::Enfileirar { operacao, voo: voo.to_string() },
                            ),
                            _ => println!("Uso: enfileirar <decolagem|pouso> <voo>"),
                        }
                    }
                    "autorizar" => {
                        match (parts.get(1).and_then(|s| parse_kind(s)), parts.get(2)) {
                            (Some(operacao), Some(pista)) => run_console(
                                tower,
                                Command::Autorizar { operacao, pista: pista.to_string() },
                            ),
                            _ => println!("Uso: autorizar <decolagem|pouso> <pista>"),
                        }
                    }
                    "status" => run_console(
                        tower,
                        Command::Status {
                            por_prioridade: parts.get(1) == Some(&"prioridade"),
                        },
                    ),
                    "relatorio" => run_console(tower, Command::Relatorio),
                    "help" | "?" => print_help(),
                    "exit" | "quit" => break,
                    other => println!("Comando desconhecido: {other}"),
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(err) => {
                println!("Erro: {:?}", err);
                break;
            }
        }
    }
    Ok(())
}

fn run_console(tower: &Tower, command: Command) {
    if let Err(err) = execute(tower, &command) {
        report_error(&err);
    }
}

fn print_help() {
    println!("\nComandos disponíveis:");
    println!("  importar-dados              - Valida os arquivos de referência");
    println!("  listar [ordem]              - Lista planos de voo: voo, etd, tipo, prioridade");
    println!("  enfileirar <oper> <voo>     - Enfileira o voo para decolagem ou pouso");
    println!("  autorizar <oper> <pista>    - Autoriza a próxima operação da fila");
    println!("  status [prioridade]         - Mostra pistas e filas");
    println!("  relatorio                   - Gera o sumário do turno");
    println!("  help / ?                    - Mostra este menu");
    println!("  exit / quit                 - Encerra o console\n");
}
