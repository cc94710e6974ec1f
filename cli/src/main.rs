//! Inventory CLI
//!
//! Terminal front end for the workplace inventory service. Every command
//! goes through the same role-gated screens as any other front end.
//!
//! ```sh
//! # Sign in (config from ~/.config/inventory-client/config.toml)
//! inventory login -u admin -p secret
//!
//! # Create a workplace and save its QR image
//! inventory workplace create --name WS-7 --location "Room 12" --pc HP-800 --qr-out ws7.png
//!
//! # Page through every workplace
//! inventory workplace list
//! ```

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use tracing::{error, info, warn};

use inventory_client::config::AppConfig;
use inventory_client::domain::{Role, WorkplaceCreateDto, WorkplaceRecord};
use inventory_client::interfaces::screens::{
    ChangePasswordScreen, CreateUserScreen, CreateWorkspaceScreen, DeleteWorkspaceScreen,
    EditWorkspaceScreen, FindWorkspaceScreen, LoginScreen, LoginView, MainScreen, UsersScreen,
    WorkplacesScreen,
};
use inventory_client::interfaces::{Access, AppContext, Screen, ScreenError, ScreenId, ScreenScope};

/// Workplace inventory client.
#[derive(Parser, Debug)]
#[command(
    name = "inventory",
    version,
    about = "Client for the workplace inventory service",
    long_about = "Client for the workplace inventory service.\n\n\
                  Default config: ~/.config/inventory-client/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "INVENTORY_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Override the service base URL.
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in and store the session
    Login {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        password: String,
    },
    /// Forget the stored session
    Logout,
    /// Replace the initial password after a first login
    ChangePassword {
        #[arg(long)]
        current: String,
        #[arg(long)]
        new: String,
        #[arg(long)]
        confirm: String,
    },
    /// Show the signed-in role and the available menu
    Status,
    /// Workplace records
    #[command(subcommand)]
    Workplace(WorkplaceCommand),
    /// User administration
    #[command(subcommand)]
    User(UserCommand),
}

#[derive(Subcommand, Debug)]
enum WorkplaceCommand {
    Create {
        #[command(flatten)]
        fields: WorkplaceFields,
        /// Where to save the QR image
        #[arg(long)]
        qr_out: Option<PathBuf>,
    },
    Find {
        name: String,
        /// Where to save the QR image
        #[arg(long)]
        qr_out: Option<PathBuf>,
    },
    /// Look up a record by name and overwrite the given fields
    Edit {
        name: String,
        #[arg(long)]
        new_name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        pc: Option<String>,
        #[arg(long)]
        monitor: Option<String>,
        #[arg(long)]
        telephone: Option<String>,
    },
    Delete {
        name: String,
    },
    List,
}

#[derive(Args, Debug)]
struct WorkplaceFields {
    #[arg(long)]
    name: String,
    #[arg(long, default_value = "")]
    description: String,
    #[arg(long)]
    location: String,
    #[arg(long)]
    pc: String,
    #[arg(long, default_value = "")]
    monitor: String,
    #[arg(long, default_value = "")]
    telephone: String,
}

impl From<WorkplaceFields> for WorkplaceCreateDto {
    fn from(f: WorkplaceFields) -> Self {
        Self {
            name: f.name,
            description: f.description,
            location: f.location,
            pc: f.pc,
            monitor: f.monitor,
            telephone: f.telephone,
        }
    }
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    Create {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        password: String,
        /// SAdmin, Admin or User
        #[arg(short, long, default_value = "User")]
        role: String,
    },
    List,
    Delete {
        id: i32,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // ── Load configuration ─────────────────────────────────────
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(inventory_client::default_config_path);

    let loaded = AppConfig::load(&config_path);
    let mut config = match &loaded {
        Ok(cfg) => cfg.clone(),
        Err(_) => AppConfig::default(),
    };

    // ── Apply CLI overrides ────────────────────────────────────
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }

    // Init tracing first so subsequent logs are formatted properly
    inventory_client::init_tracing(&config.logging);
    match loaded {
        Ok(_) => info!("Configuration loaded from {}", config_path.display()),
        Err(e) => {
            error!("Failed to load config from {}: {}", config_path.display(), e);
            error!("Using default configuration.");
        }
    }

    if let Some(ref url) = cli.base_url {
        info!("CLI override: base_url = {}", url);
        config.api.base_url = url.clone();
    }

    let ctx = AppContext::from_config(&config)?;
    info!("Start destination: {:?}", ctx.start_destination());

    // ── Run the command, cancelling on Ctrl+C ──────────────────
    let mut scope = ScreenScope::new(screen_of(&cli.command));
    let task_ctx = ctx.clone();
    scope.spawn(async move { run(&task_ctx, cli.command).await });

    let result = tokio::select! {
        out = scope.next() => out.unwrap_or_else(|| Err(CliError::Message("Команда прервана".into()))),
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupted");
            scope.cancel();
            return Ok(());
        }
    };

    match result {
        Ok(()) => Ok(()),
        Err(CliError::Denied(message)) => {
            eprintln!("{message}");
            std::process::exit(3);
        }
        Err(CliError::Screen(ScreenError::SignInRequired)) => {
            eprintln!("{}", ScreenError::SignInRequired);
            std::process::exit(2);
        }
        Err(e) => {
            error!("{}", e);
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}

#[derive(Debug)]
enum CliError {
    Denied(String),
    Screen(ScreenError),
    Message(String),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Denied(msg) | Self::Message(msg) => write!(f, "{msg}"),
            Self::Screen(e) => write!(f, "{e}"),
        }
    }
}

impl From<ScreenError> for CliError {
    fn from(e: ScreenError) -> Self {
        Self::Screen(e)
    }
}

type CliResult<T> = Result<T, CliError>;

fn screen_of(command: &Command) -> ScreenId {
    match command {
        Command::Login { .. } => ScreenId::Login,
        Command::ChangePassword { .. } => ScreenId::ChangePassword,
        Command::Logout | Command::Status => ScreenId::Main,
        Command::Workplace(WorkplaceCommand::Create { .. }) => ScreenId::CreateWorkspace,
        Command::Workplace(WorkplaceCommand::Find { .. }) => ScreenId::FindWorkspace,
        Command::Workplace(WorkplaceCommand::Edit { .. }) => ScreenId::EditWorkspace,
        Command::Workplace(WorkplaceCommand::Delete { .. }) => ScreenId::DeleteWorkspace,
        Command::Workplace(WorkplaceCommand::List) => ScreenId::Workplaces,
        Command::User(UserCommand::Create { .. }) => ScreenId::CreateUser,
        Command::User(UserCommand::List | UserCommand::Delete { .. }) => ScreenId::Users,
    }
}

fn enter<S: Screen>(ctx: &AppContext) -> CliResult<S> {
    match ctx.enter::<S>() {
        Access::Granted(screen) => Ok(screen),
        Access::Denied(denied) => Err(CliError::Denied(format!(
            "{} [{}]",
            denied.message(),
            denied.back_label()
        ))),
    }
}

async fn run(ctx: &AppContext, command: Command) -> CliResult<()> {
    match command {
        Command::Login { username, password } => {
            let screen = enter::<LoginScreen>(ctx)?;
            match screen.submit(&username, &password).await? {
                LoginView::Main { role, menu } => print_menu(role, &menu),
                LoginView::ChangePassword { username, notice } => {
                    println!("{notice}");
                    println!("inventory change-password  (пользователь '{username}')");
                }
            }
        }
        Command::Logout => {
            let screen = enter::<MainScreen>(ctx)?;
            screen.logout()?;
            println!("{}", ScreenId::Login);
        }
        Command::ChangePassword { current, new, confirm } => {
            let screen = enter::<ChangePasswordScreen>(ctx)?;
            println!("{}", screen.greeting()?);
            let (view, notice) = screen.submit(&current, &new, &confirm).await?;
            println!("{notice}");
            if let LoginView::Main { role, menu } = view {
                print_menu(role, &menu);
            }
        }
        Command::Status => {
            let screen = enter::<MainScreen>(ctx)?;
            print_menu(screen.role(), &screen.menu());
        }
        Command::Workplace(cmd) => run_workplace(ctx, cmd).await?,
        Command::User(cmd) => run_user(ctx, cmd).await?,
    }
    Ok(())
}

async fn run_workplace(ctx: &AppContext, command: WorkplaceCommand) -> CliResult<()> {
    match command {
        WorkplaceCommand::Create { fields, qr_out } => {
            let screen = enter::<CreateWorkspaceScreen>(ctx)?;
            let created = screen.submit(&WorkplaceCreateDto::from(fields)).await?;
            print_record(&created.record);
            handle_qr(created.qr, qr_out.as_deref(), &created.record).await;
        }
        WorkplaceCommand::Find { name, qr_out } => {
            let screen = enter::<FindWorkspaceScreen>(ctx)?;
            let found = screen.search(&name).await?;
            print_record(&found.record);
            handle_qr(found.qr, qr_out.as_deref(), &found.record).await;
        }
        WorkplaceCommand::Edit {
            name,
            new_name,
            description,
            location,
            pc,
            monitor,
            telephone,
        } => {
            let screen = enter::<EditWorkspaceScreen>(ctx)?;
            let mut form = screen.search(&name).await?;
            let overrides = [
                (&mut form.name, new_name),
                (&mut form.description, description),
                (&mut form.location, location),
                (&mut form.pc, pc),
                (&mut form.monitor, monitor),
                (&mut form.telephone, telephone),
            ];
            for (field, value) in overrides {
                if let Some(value) = value {
                    *field = value;
                }
            }
            println!("{}", screen.save(&form).await?);
        }
        WorkplaceCommand::Delete { name } => {
            let screen = enter::<DeleteWorkspaceScreen>(ctx)?;
            println!("{}", screen.submit(&name).await?);
        }
        WorkplaceCommand::List => {
            let screen = enter::<WorkplacesScreen>(ctx)?;
            let mut shown = 0;
            while screen.load_more().await? {
                let items = screen.items();
                for record in &items[shown..] {
                    println!(
                        "{:>6}  {:<20} {:<20} {}",
                        record.id, record.name, record.location, record.pc
                    );
                }
                shown = items.len();
            }
            if let Some(total) = screen.total() {
                println!("{shown} / {total}");
            }
        }
    }
    Ok(())
}

async fn run_user(ctx: &AppContext, command: UserCommand) -> CliResult<()> {
    match command {
        UserCommand::Create { username, password, role } => {
            let screen = enter::<CreateUserScreen>(ctx)?;
            let role = Role::parse(&role);
            println!("{}", screen.submit(&username, &password, role).await?);
        }
        UserCommand::List => {
            let screen = enter::<UsersScreen>(ctx)?;
            let users = screen.reload().await?;
            if users.is_empty() {
                println!("{}", inventory_client::interfaces::screens::messages::NO_USERS);
            }
            for user in users {
                println!(
                    "{:>6}  {:<30} {}",
                    user.id,
                    user.display_name(),
                    user.role_name.as_deref().unwrap_or("")
                );
            }
        }
        UserCommand::Delete { id } => {
            let screen = enter::<UsersScreen>(ctx)?;
            screen.reload().await?;
            println!("{}", screen.delete_by_id(id).await?);
        }
    }
    Ok(())
}

fn print_menu(role: Role, menu: &[ScreenId]) {
    println!("{} ({})", ScreenId::Main, role);
    for screen in menu {
        println!("  - {screen}");
    }
}

fn print_record(record: &WorkplaceRecord) {
    println!("ID: {}", record.id);
    println!("Имя: {}", record.name);
    println!("Описание: {}", record.description);
    println!("Локация: {}", record.location);
    println!("ПК: {}", record.pc);
    println!("Монитор: {}", record.monitor);
    println!("Телефон: {}", record.telephone);
    if let Some(created_at) = record.created_at {
        println!("Создано: {}", created_at.format("%d.%m.%Y %H:%M"));
    }
    if let Some(ref created_by) = record.created_by {
        println!("Создано кем: {created_by}");
    }
}

async fn handle_qr(qr: Result<Vec<u8>, String>, out: Option<&Path>, record: &WorkplaceRecord) {
    let bytes = match qr {
        Ok(bytes) if !bytes.is_empty() => bytes,
        Ok(_) => {
            eprintln!("QR-код не доступен");
            return;
        }
        Err(message) => {
            eprintln!("{message}");
            return;
        }
    };

    let path = out
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(format!("QR_{}.png", record.id)));

    match tokio::fs::write(&path, &bytes).await {
        Ok(()) => println!("QR-код сохранён: {}", path.display()),
        Err(e) => {
            warn!("Cannot write {}: {}", path.display(), e);
            eprintln!("Ошибка сохранения: {e}");
        }
    }
}
