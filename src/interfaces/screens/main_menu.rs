use crate::application::AuthService;
use crate::domain::Role;

use super::{AppContext, Screen, ScreenId, ScreenResult};

/// Landing screen: role-derived menu and logout
pub struct MainScreen {
    auth: AuthService,
    role: Role,
}

impl Screen for MainScreen {
    const ID: ScreenId = ScreenId::Main;

    fn open(ctx: &AppContext) -> Self {
        Self {
            auth: AuthService::new(ctx.client().clone()),
            role: ctx.role(),
        }
    }
}

impl MainScreen {
    pub fn role(&self) -> Role {
        self.role
    }

    pub fn menu(&self) -> Vec<ScreenId> {
        ScreenId::menu_for(self.role)
    }

    /// Clear the session; the caller navigates to Login
    pub fn logout(&self) -> ScreenResult<ScreenId> {
        self.auth.logout()?;
        Ok(ScreenId::Login)
    }
}
