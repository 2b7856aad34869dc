//! Command-line host for `.hrplan` documents.
//!
//! # Responsibility
//! - Act as the host storage and presentation layer for `hrplan_core`.
//! - Translate subcommands into edit intents and print rendered views.

mod render;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use hrplan_core::{
    init_logging, ActiveTab, DocumentService, EditIntent, EditOutcome, EmbedView,
    FileDocumentView, FsVault, PlanSession, Settings, ViewState,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "hrplan")]
#[command(about = "Edit and summarize resource allocation plans (.hrplan)")]
struct Cli {
    /// Vault directory holding plan documents
    #[arg(long, global = true, default_value = ".")]
    dir: PathBuf,

    /// Settings file (YAML); defaults apply when missing
    #[arg(long, global = true, default_value = "hrplan.yaml")]
    config: PathBuf,

    /// Log level override (trace|debug|info|warn|error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Absolute directory for rolling log files; logging is off when omitted
    #[arg(long, global = true)]
    log_dir: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new plan from the template (Untitled.hrplan, Untitled 1.hrplan, ...)
    New,
    /// Render one tab of a plan
    Show {
        file: PathBuf,
        #[arg(short, long, value_enum, default_value_t = TabArg::MemberToTheme)]
        tab: TabArg,
    },
    /// Set one allocation cell
    Set {
        file: PathBuf,
        member: String,
        theme: String,
        month: String,
        value: String,
    },
    /// Rename a theme and every allocation that references it
    RenameTheme {
        file: PathBuf,
        old_name: String,
        new_name: String,
    },
    /// Rename a member and every allocation that references it
    RenameMember {
        file: PathBuf,
        old_name: String,
        new_name: String,
    },
    /// Append a placeholder theme
    AddTheme { file: PathBuf },
    /// Append a placeholder member
    AddMember { file: PathBuf },
    /// Remove a theme from the master list (allocations are kept)
    DeleteTheme { file: PathBuf, index: usize },
    /// Remove a member from the master list (allocations are kept)
    DeleteMember { file: PathBuf, index: usize },
    /// Set a member's cost rate
    SetRate {
        file: PathBuf,
        index: usize,
        rate: String,
    },
    /// Print a read-only summary of a linked plan
    Embed { link: String },
}

#[derive(Clone, Copy, ValueEnum)]
enum TabArg {
    MemberToTheme,
    ThemeToMember,
    Master,
    Source,
}

impl From<TabArg> for ActiveTab {
    fn from(value: TabArg) -> Self {
        match value {
            TabArg::MemberToTheme => ActiveTab::MemberToTheme,
            TabArg::ThemeToMember => ActiveTab::ThemeToMember,
            TabArg::Master => ActiveTab::Master,
            TabArg::Source => ActiveTab::Source,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = if cli.config.is_absolute() {
        cli.config.clone()
    } else {
        cli.dir.join(&cli.config)
    };
    let settings = Settings::load_or_default(&config_path)
        .with_context(|| format!("loading settings from {}", config_path.display()))?;

    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(&settings.log_level);
        init_logging(level, log_dir).context("initializing logging")?;
    }

    let (file, intent) = match cli.command {
        Commands::New => {
            let mut service = DocumentService::new(FsVault::new(&cli.dir), settings);
            let path = service.create_new_document()?;
            println!("{path}");
            return Ok(());
        }
        Commands::Embed { link } => {
            let service = DocumentService::new(FsVault::new(&cli.dir), settings);
            match service.embed(&link) {
                Some(EmbedView::Found(summary)) => print!("{}", render::embed_summary(&summary)),
                Some(EmbedView::Missing { warning }) => println!("{warning}"),
                None => {}
            }
            return Ok(());
        }
        Commands::Show { file, tab } => {
            let session = open_session(&cli.dir, &file, settings)?;
            let rendered = session.render(&ViewState::new(tab.into()));
            print!("{}", render::rendered_view(&rendered));
            return Ok(());
        }
        Commands::Set {
            file,
            member,
            theme,
            month,
            value,
        } => (
            file,
            EditIntent::SetCell {
                member,
                theme,
                month,
                value,
            },
        ),
        Commands::RenameTheme {
            file,
            old_name,
            new_name,
        } => (file, EditIntent::RenameTheme { old_name, new_name }),
        Commands::RenameMember {
            file,
            old_name,
            new_name,
        } => (file, EditIntent::RenameMember { old_name, new_name }),
        Commands::AddTheme { file } => (file, EditIntent::AddTheme),
        Commands::AddMember { file } => (file, EditIntent::AddMember),
        Commands::DeleteTheme { file, index } => (file, EditIntent::DeleteTheme { index }),
        Commands::DeleteMember { file, index } => (file, EditIntent::DeleteMember { index }),
        Commands::SetRate { file, index, rate } => {
            (file, EditIntent::SetMemberRate { index, rate })
        }
    };

    let mut session = open_session(&cli.dir, &file, settings)?;
    match session.apply(intent) {
        EditOutcome::Persisted => println!("saved {}", session.view().path().display()),
        EditOutcome::Unchanged => println!("unchanged"),
    }
    Ok(())
}

fn open_session(
    dir: &std::path::Path,
    file: &std::path::Path,
    settings: Settings,
) -> anyhow::Result<PlanSession<FileDocumentView>> {
    let path = if file.is_absolute() {
        file.to_path_buf()
    } else {
        dir.join(file)
    };
    let view = FileDocumentView::open(&path)
        .with_context(|| format!("opening {}", path.display()))?;
    Ok(PlanSession::open(view, settings))
}
