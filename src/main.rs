use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

mod cmd;

#[derive(Parser)]
#[command(name = "pms")]
#[command(version, about = "Command-line client for the project-management service")]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory holding pms.toml, the session and kanban layouts (default: ~/.pms)
    #[arg(long, global = true, env = "PMS_HOME")]
    pub state_dir: Option<PathBuf>,

    /// API base URL. Overrides pms.toml and PMS_API_URL.
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in and store the session
    Login {
        #[arg(short, long)]
        username: Option<String>,
        /// Prompted for when omitted
        #[arg(long, env = "PMS_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Log out and forget the stored session
    Logout,
    /// Create a new account
    Signup {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        email: String,
    },
    /// Show the signed-in user
    Whoami,
    /// View or change user profiles
    User {
        #[command(subcommand)]
        command: UserCommands,
    },
    /// Organizations and their administrators
    Orgs {
        #[command(subcommand)]
        command: OrgsCommands,
    },
    /// Projects, their members and tasks
    Projects {
        #[command(subcommand)]
        command: ProjectsCommands,
    },
    /// Project phases and their boards
    Phases {
        #[command(subcommand)]
        command: PhasesCommands,
    },
    /// Tasks, their assignees and status
    Tasks {
        #[command(subcommand)]
        command: TasksCommands,
    },
    /// Arrange the column order of a phase board
    Kanban {
        #[command(subcommand)]
        command: KanbanCommands,
    },
    /// Industries and project templates
    Catalog {
        #[command(subcommand)]
        command: CatalogCommands,
    },
    /// View or validate configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
pub enum UserCommands {
    /// Show a user's profile
    Show { username_slug: String },
    /// Change your username
    Rename { username: String },
}

#[derive(Subcommand, Clone)]
pub enum OrgsCommands {
    /// List organizations you belong to
    List,
    /// Search organizations by name
    Search { name: String },
    /// Show an organization and its projects
    Show { slug: String },
    /// Create an organization
    Create { name: String },
    /// Join an organization with its password
    Join { name: String },
    Admins { organization_id: String },
    NonAdmins { organization_id: String },
    /// Promote members to administrators
    AddAdmins {
        organization_id: String,
        #[arg(required = true)]
        usernames: Vec<String>,
    },
    /// Leave an organization
    Leave {
        organization_id: String,
        /// Skip confirmation prompt
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand, Clone)]
pub enum ProjectsCommands {
    /// List your projects
    List,
    /// Create a project in an organization
    Create {
        #[arg(long)]
        organization: String,
        #[arg(long)]
        name: String,
        /// Deadline as YYYY-MM-DD
        #[arg(long)]
        deadline: chrono::NaiveDate,
        #[arg(long, default_value = "")]
        description: String,
        /// Template whose phases the project starts with
        #[arg(long)]
        template: Option<String>,
    },
    Stats { project_id: String },
    Members { project_id: String },
    /// Organization members not on the project
    NonMembers { project_id: String },
    AddMembers {
        project_id: String,
        #[arg(required = true)]
        usernames: Vec<String>,
    },
    /// List every task in the project
    Tasks { project_id: String },
    /// List the project's phases in order
    Phases { project_id: String },
}

#[derive(Subcommand, Clone)]
pub enum PhasesCommands {
    /// Show a phase's tasks as a kanban board
    Board {
        phase_id: String,
        /// Report which column holds this task
        #[arg(long)]
        task: Option<String>,
    },
    Create { project_id: String, name: String },
    Rename { phase_id: String, name: String },
    Delete {
        phase_id: String,
        /// Skip confirmation prompt
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand, Clone)]
pub enum TasksCommands {
    Show { task_id: String },
    Create {
        #[arg(long)]
        phase: String,
        #[arg(long)]
        name: String,
        /// Deadline as YYYY-MM-DD, no earlier than tomorrow
        #[arg(long)]
        deadline: chrono::NaiveDate,
        #[arg(long, default_value = "")]
        description: String,
    },
    Assign {
        task_id: String,
        #[arg(required = true)]
        usernames: Vec<String>,
    },
    /// Project members not assigned to the task
    NonAssignees { task_id: String },
    /// Move a task to another board column
    Move {
        task_id: String,
        /// onHold, inProgress or completed
        column: String,
    },
}

#[derive(Subcommand, Clone)]
pub enum KanbanCommands {
    /// Show the column order for a phase
    Show { phase_id: String },
    /// Move the column at position FROM to position TO (1-based)
    Move { phase_id: String, from: usize, to: usize },
    /// Restore the default column order
    Reset { phase_id: String },
}

#[derive(Subcommand, Clone)]
pub enum CatalogCommands {
    Industries,
    /// Search project templates by name
    Templates {
        #[arg(default_value = "")]
        name: String,
    },
    CreateTemplate {
        #[arg(long)]
        industry: String,
        #[arg(long)]
        name: String,
        /// Phase names in workflow order
        #[arg(long = "phase", required = true)]
        phases: Vec<String>,
    },
}

#[derive(Subcommand, Clone)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Validate configuration and show any warnings
    Validate,
    /// Initialize a default pms.toml file
    Init,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

async fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Config { command } => cmd::cmd_config(cli, command.clone()),
        Commands::Kanban { command } => cmd::cmd_kanban(cli, command.clone()),
        Commands::Login { username, password } => {
            let mut ctx = cmd::Context::load(cli)?;
            cmd::cmd_login(&mut ctx, username.clone(), password.clone()).await
        }
        Commands::Logout => {
            let mut ctx = cmd::Context::load(cli)?;
            cmd::cmd_logout(&mut ctx).await
        }
        Commands::Signup { username, email } => {
            let mut ctx = cmd::Context::load(cli)?;
            cmd::cmd_signup(&mut ctx, username, email).await
        }
        Commands::Whoami => {
            let ctx = cmd::Context::load(cli)?;
            cmd::cmd_whoami(&ctx)
        }
        Commands::User { command } => {
            let mut ctx = cmd::Context::load(cli)?;
            cmd::cmd_user(&mut ctx, command.clone()).await
        }
        Commands::Orgs { command } => {
            let mut ctx = cmd::Context::load(cli)?;
            cmd::cmd_orgs(&mut ctx, command.clone()).await
        }
        Commands::Projects { command } => {
            let mut ctx = cmd::Context::load(cli)?;
            cmd::cmd_projects(&mut ctx, command.clone()).await
        }
        Commands::Phases { command } => {
            let mut ctx = cmd::Context::load(cli)?;
            cmd::cmd_phases(&mut ctx, command.clone()).await
        }
        Commands::Tasks { command } => {
            let mut ctx = cmd::Context::load(cli)?;
            cmd::cmd_tasks(&mut ctx, command.clone()).await
        }
        Commands::Catalog { command } => {
            let mut ctx = cmd::Context::load(cli)?;
            cmd::cmd_catalog(&mut ctx, command.clone()).await
        }
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(&cli).await {
        eprintln!("{} {}", console::style("Error:").red().bold(), cmd::describe_error(&e));
        std::process::exit(1);
    }
}
