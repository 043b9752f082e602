use std::path::{Path, PathBuf};
use std::process;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use feuille_emargement::{
    Error, Formation, LayoutOptions, LogoAlignment, Repository, RosterStore, Selection, Site,
};

#[derive(Parser)]
#[command(name = "feuille-emargement", version, about = "Print CFA attendance sheets as PDF")]
struct Cli {
    /// Roster file (JSON)
    #[arg(short, long, global = true, default_value = "roster.json")]
    roster: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print attendance sheets for a session
    Generate(GenerateArgs),
    /// List sessions
    Sessions,
    /// List the periods of a session with their ids
    Periods {
        #[arg(long)]
        session: u32,
    },
    /// List the candidates of a session with their ids
    Candidates {
        #[arg(long)]
        session: u32,
    },
    /// Create a session and print its id
    CreateSession {
        #[arg(long)]
        site: Site,
        #[arg(long)]
        formation: Formation,
    },
    /// Enrol a candidate in a session
    AddCandidate {
        #[arg(long)]
        session: u32,
        #[arg(long)]
        surname: String,
        #[arg(long)]
        given_name: String,
    },
    /// Remove a candidate
    RemoveCandidate { id: u32 },
    /// Add a period (dates as YYYY-MM-DD)
    AddPeriod {
        #[arg(long)]
        session: u32,
        #[arg(long)]
        start: NaiveDate,
        #[arg(long)]
        end: NaiveDate,
    },
    /// Mark a session cancelled
    CancelSession { id: u32 },
    /// Delete a session with its candidates and periods
    DeleteSession { id: u32 },
    /// Rename a session from "Formation - Site"
    RenameSession { id: u32, name: String },
}

#[derive(Args)]
struct GenerateArgs {
    #[arg(long)]
    session: u32,
    #[arg(long)]
    period: Option<u32>,
    /// Every period of the session (takes precedence over --period)
    #[arg(long)]
    all_periods: bool,
    #[arg(long)]
    candidate: Option<u32>,
    /// Every candidate of the session (takes precedence over --candidate)
    #[arg(long)]
    all_candidates: bool,
    #[arg(short, long, default_value = feuille_emargement::ATTACHMENT_FILENAME)]
    output: PathBuf,
    /// Layout options file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Drop the candidate signature column
    #[arg(long)]
    no_candidate_signature: bool,
    /// Logo image (PNG or JPEG)
    #[arg(long)]
    logo: Option<PathBuf>,
    /// Put the logo in the top-left corner
    #[arg(long)]
    logo_left: bool,
    /// Print "Page n / N" at the bottom of each sheet
    #[arg(long)]
    page_numbers: bool,
}

impl GenerateArgs {
    fn layout_options(&self) -> Result<LayoutOptions, Error> {
        let mut options = match &self.config {
            Some(path) => LayoutOptions::load(path)?,
            None => LayoutOptions::default(),
        };
        if self.no_candidate_signature {
            options.include_candidate_signature_column = false;
        }
        if let Some(logo) = &self.logo {
            options.include_logo = true;
            options.logo_path = Some(logo.clone());
        }
        if self.logo_left {
            options.logo_alignment = LogoAlignment::Left;
        }
        if self.page_numbers {
            options.footer_page_number = true;
        }
        Ok(options)
    }
}

fn generate(roster: &Path, args: &GenerateArgs) -> Result<(), Error> {
    let store = RosterStore::load(roster)?;
    let periods = Selection::from_flags(args.all_periods, args.period, "period")?;
    let candidates = Selection::from_flags(args.all_candidates, args.candidate, "candidate")?;
    let options = args.layout_options()?;
    feuille_emargement::generate_attendance_file(
        &store,
        args.session,
        &periods,
        &candidates,
        &options,
        &args.output,
    )?;
    println!("{}", args.output.display());
    Ok(())
}

fn list_sessions(roster: &Path) -> Result<(), Error> {
    let store = RosterStore::load(roster)?;
    for session in store.sessions() {
        println!(
            "{}  {}{}  ({} candidates, {} periods)",
            session.code,
            session.display_name(),
            if session.cancelled { " [annulée]" } else { "" },
            store.candidate_count(session.id),
            store.period_count(session.id),
        );
    }
    Ok(())
}

fn period_lines(repo: &impl Repository, session: u32) -> Result<Vec<String>, Error> {
    Ok(repo
        .periods(session, &Selection::All)?
        .iter()
        .map(|p| format!("{}  {}  ({} h)", p.id, p.range_label(), p.duration_hours()))
        .collect())
}

fn candidate_lines(repo: &impl Repository, session: u32) -> Result<Vec<String>, Error> {
    Ok(repo
        .candidates(session, &Selection::All)?
        .iter()
        .map(|c| format!("{}  {}", c.id, c.full_name()))
        .collect())
}

fn print_lines(lines: Vec<String>) {
    for line in lines {
        println!("{line}");
    }
}

/// Load the roster, apply `edit`, save it back.
fn mutate<T>(
    roster: &Path,
    edit: impl FnOnce(&mut RosterStore) -> Result<T, Error>,
) -> Result<T, Error> {
    let mut store = RosterStore::load_or_default(roster)?;
    let out = edit(&mut store)?;
    store.save(roster)?;
    Ok(out)
}

fn run(cli: Cli) -> Result<(), Error> {
    let roster = cli.roster.as_path();
    match cli.command {
        Command::Generate(args) => generate(roster, &args),
        Command::Sessions => list_sessions(roster),
        Command::Periods { session } => {
            print_lines(period_lines(&RosterStore::load(roster)?, session)?);
            Ok(())
        }
        Command::Candidates { session } => {
            print_lines(candidate_lines(&RosterStore::load(roster)?, session)?);
            Ok(())
        }
        Command::CreateSession { site, formation } => {
            let id = mutate(roster, |s| Ok(s.create_session(site, formation)))?;
            println!("{id}");
            Ok(())
        }
        Command::AddCandidate {
            session,
            surname,
            given_name,
        } => {
            let id = mutate(roster, |s| s.add_candidate(session, &surname, &given_name))?;
            println!("{id}");
            Ok(())
        }
        Command::RemoveCandidate { id } => mutate(roster, |s| s.remove_candidate(id).map(drop)),
        Command::AddPeriod {
            session,
            start,
            end,
        } => {
            let id = mutate(roster, |s| s.add_period(session, start, end))?;
            println!("{id}");
            Ok(())
        }
        Command::CancelSession { id } => {
            if !mutate(roster, |s| s.cancel_session(id))? {
                println!("session {id} was already cancelled");
            }
            Ok(())
        }
        Command::DeleteSession { id } => mutate(roster, |s| s.delete_session(id).map(drop)),
        Command::RenameSession { id, name } => {
            mutate(roster, |s| s.rename_session(id, &name))?;
            let store = RosterStore::load(roster)?;
            println!("{}", store.session(id)?.display_name());
            Ok(())
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
