//! Role-gated screens
//!
//! Every screen declares the roles allowed to use it. Entering a screen
//! checks the stored role once and yields either the screen controller or an
//! [`AccessDenied`] value; a denied screen has no controller, so it cannot
//! reach the backend. The check is a UX convenience, the backend enforces
//! authorization on its own.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::AppConfig;
use crate::domain::{Role, RoleSet};
use crate::infrastructure::{ApiClient, FileSessionStore, SessionStore};
use crate::shared::{ClientError, ClientResult};

pub mod change_password;
pub mod create_user;
pub mod create_workspace;
pub mod delete_workspace;
pub mod edit_workspace;
pub mod find_workspace;
pub mod login;
pub mod main_menu;
pub mod messages;
pub mod scope;
pub mod users;
pub mod workplaces;

pub use change_password::ChangePasswordScreen;
pub use create_user::CreateUserScreen;
pub use create_workspace::{CreateWorkspaceScreen, CreatedView};
pub use delete_workspace::DeleteWorkspaceScreen;
pub use edit_workspace::EditWorkspaceScreen;
pub use find_workspace::{FindWorkspaceScreen, FoundView};
pub use login::{LoginScreen, LoginView};
pub use main_menu::MainScreen;
pub use scope::ScreenScope;
pub use users::UsersScreen;
pub use workplaces::WorkplacesScreen;

/// Navigation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScreenId {
    Login,
    ChangePassword,
    Main,
    FindWorkspace,
    CreateWorkspace,
    DeleteWorkspace,
    EditWorkspace,
    Workplaces,
    CreateUser,
    Users,
}

impl ScreenId {
    /// Menu entries in display order
    pub const MENU: [ScreenId; 7] = [
        ScreenId::FindWorkspace,
        ScreenId::CreateWorkspace,
        ScreenId::DeleteWorkspace,
        ScreenId::EditWorkspace,
        ScreenId::Workplaces,
        ScreenId::CreateUser,
        ScreenId::Users,
    ];

    pub fn permitted(&self) -> RoleSet {
        match self {
            Self::Login | Self::ChangePassword => RoleSet::ANYONE,
            Self::Main | Self::FindWorkspace | Self::Workplaces => RoleSet::SIGNED_IN,
            Self::CreateWorkspace | Self::DeleteWorkspace | Self::EditWorkspace => RoleSet::MANAGERS,
            Self::CreateUser | Self::Users => RoleSet::SUPER_ADMIN,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Login => "Вход",
            Self::ChangePassword => "Смените пароль",
            Self::Main => "Главная",
            Self::FindWorkspace => "Найти",
            Self::CreateWorkspace => "Создать рабочее место",
            Self::DeleteWorkspace => "Удалить рабочее место",
            Self::EditWorkspace => "Изменить рабочее место",
            Self::Workplaces => "Рабочие места",
            Self::CreateUser => "Создать пользователя",
            Self::Users => "Управление пользователями",
        }
    }

    /// Menu entries visible to `role`
    pub fn menu_for(role: Role) -> Vec<ScreenId> {
        Self::MENU
            .into_iter()
            .filter(|screen| screen.permitted().contains(role))
            .collect()
    }
}

impl std::fmt::Display for ScreenId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title())
    }
}

/// Fixed "access denied" state with a single back action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessDenied {
    pub screen: ScreenId,
    pub role: Role,
}

impl AccessDenied {
    pub fn message(&self) -> String {
        messages::access_denied(self.screen.permitted())
    }

    pub fn back_label(&self) -> &'static str {
        messages::BACK
    }
}

/// Outcome of entering a screen
#[derive(Debug)]
pub enum Access<S> {
    Granted(S),
    Denied(AccessDenied),
}

impl<S> Access<S> {
    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Granted(_))
    }

    pub fn granted(self) -> Result<S, AccessDenied> {
        match self {
            Self::Granted(screen) => Ok(screen),
            Self::Denied(denied) => Err(denied),
        }
    }
}

/// Error surfaced by a screen action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenError {
    /// The session is gone; navigate to the login screen
    SignInRequired,
    /// Show this message and stay on the screen
    Message(String),
}

impl std::fmt::Display for ScreenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SignInRequired => write!(f, "{}", messages::SIGN_IN_REQUIRED),
            Self::Message(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for ScreenError {}

impl ScreenError {
    /// Map a client error, using `describe` for everything except an
    /// expired session
    pub fn from_client(err: ClientError, describe: impl FnOnce(&ClientError) -> String) -> Self {
        match err {
            ClientError::SessionExpired => Self::SignInRequired,
            other => Self::Message(describe(&other)),
        }
    }

    pub fn message(msg: impl Into<String>) -> Self {
        Self::Message(msg.into())
    }
}

impl From<ClientError> for ScreenError {
    fn from(err: ClientError) -> Self {
        Self::from_client(err, messages::describe)
    }
}

pub type ScreenResult<T> = Result<T, ScreenError>;

/// A screen controller that can be entered from an [`AppContext`]
pub trait Screen: Sized {
    const ID: ScreenId;

    fn open(ctx: &AppContext) -> Self;
}

/// Shared handles every screen is built from
#[derive(Clone)]
pub struct AppContext {
    client: Arc<ApiClient>,
    page_size: u32,
}

impl AppContext {
    pub fn new(client: Arc<ApiClient>, page_size: u32) -> Self {
        Self { client, page_size }
    }

    /// Build the client and file-backed session store from configuration
    pub fn from_config(config: &AppConfig) -> ClientResult<Self> {
        let store: Arc<dyn SessionStore> =
            Arc::new(FileSessionStore::new(config.session.resolved_path()));
        let client = ApiClient::new(&config.api, store)?;
        Ok(Self::new(Arc::new(client), config.paging.page_size()))
    }

    pub fn client(&self) -> &Arc<ApiClient> {
        &self.client
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Stored role; an unreadable store counts as signed out
    pub fn role(&self) -> Role {
        match self.client.store().role() {
            Ok(role) => role,
            Err(e) => {
                warn!("Cannot read session store: {}", e);
                Role::Unauthenticated
            }
        }
    }

    /// Main when a live credential is stored, Login otherwise.
    /// An expired credential is cleared on the way.
    pub fn start_destination(&self) -> ScreenId {
        match self.client.guard().check_stored_credential() {
            Ok(true) => ScreenId::Main,
            Ok(false) => ScreenId::Login,
            Err(e) => {
                warn!("Cannot read session store: {}", e);
                ScreenId::Login
            }
        }
    }

    /// Check the stored role against `S` and open it if permitted
    pub fn enter<S: Screen>(&self) -> Access<S> {
        let role = self.role();
        if S::ID.permitted().contains(role) {
            debug!("Entering {:?} as {}", S::ID, role);
            Access::Granted(S::open(self))
        } else {
            debug!("Access to {:?} denied for {}", S::ID, role);
            Access::Denied(AccessDenied { screen: S::ID, role })
        }
    }
}
