use std::fmt;

use tasker_core::Session;

/// Client routes, addressed by the same paths the web client used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Root,
    Home,
    Table,
    Calendar,
    Settings,
    AdminTools,
    AdminUsers,
    AdminTasks,
    AdminLogistics,
}

pub const ADMIN_REQUIRED: &str = "Admin access required";

impl Route {
    pub const ALL: &[Route] = &[
        Route::Root,
        Route::Home,
        Route::Table,
        Route::Calendar,
        Route::Settings,
        Route::AdminTools,
        Route::AdminUsers,
        Route::AdminTasks,
        Route::AdminLogistics,
    ];

    /// Entries of the admin tools menu, in display order.
    pub const ADMIN_MENU: &[Route] = &[Route::AdminUsers, Route::AdminTasks, Route::AdminLogistics];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Root => "/",
            Route::Home => "/user/home",
            Route::Table => "/user/home/table",
            Route::Calendar => "/user/home/calendar",
            Route::Settings => "/user/settings",
            Route::AdminTools => "/admin/tools",
            Route::AdminUsers => "/admin/tools/users",
            Route::AdminTasks => "/admin/tools/tasks",
            Route::AdminLogistics => "/admin/tools/logistics",
        }
    }

    pub fn parse(path: &str) -> Option<Self> {
        let path = path.trim();
        let path = if path.len() > 1 {
            path.trim_end_matches('/')
        } else {
            path
        };
        Self::ALL.iter().copied().find(|r| r.path() == path)
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Root | Route::Home => "Home",
            Route::Table => "Task Table",
            Route::Calendar => "Calendar",
            Route::Settings => "User Settings",
            Route::AdminTools => "Admin Tools",
            Route::AdminUsers => "User Management",
            Route::AdminTasks => "Task Management",
            Route::AdminLogistics => "Logistics",
        }
    }

    pub fn is_admin_only(&self) -> bool {
        matches!(
            self,
            Route::AdminTools | Route::AdminUsers | Route::AdminTasks | Route::AdminLogistics
        )
    }

    /// Where `Esc` leads from this route's main view.
    pub fn parent(&self) -> Option<Route> {
        match self {
            Route::AdminUsers | Route::AdminTasks | Route::AdminLogistics => {
                Some(Route::AdminTools)
            }
            _ => None,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Result of asking to open a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Allowed(Route),
    Redirected { to: Route, notice: &'static str },
}

impl Navigation {
    pub fn route(&self) -> Route {
        match self {
            Navigation::Allowed(route) | Navigation::Redirected { to: route, .. } => *route,
        }
    }
}

/// Apply the admin gate. `/` lands on the home view.
pub fn resolve(route: Route, session: &Session) -> Navigation {
    if route.is_admin_only() && !session.is_admin {
        return Navigation::Redirected {
            to: Route::Home,
            notice: ADMIN_REQUIRED,
        };
    }
    match route {
        Route::Root => Navigation::Allowed(Route::Home),
        other => Navigation::Allowed(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_path_parses_back() {
        for route in Route::ALL {
            assert_eq!(Route::parse(route.path()), Some(*route));
        }
    }

    #[test]
    fn parse_tolerates_trailing_slash() {
        assert_eq!(Route::parse("/admin/tools/"), Some(Route::AdminTools));
        assert_eq!(Route::parse("/"), Some(Route::Root));
        assert_eq!(Route::parse("/user/profile"), None);
    }

    #[test]
    fn non_admin_is_redirected_home() {
        let session = Session::new(false, None);
        for route in [Route::AdminTools, Route::AdminUsers, Route::AdminLogistics] {
            assert_eq!(
                resolve(route, &session),
                Navigation::Redirected {
                    to: Route::Home,
                    notice: ADMIN_REQUIRED
                }
            );
        }
        assert_eq!(resolve(Route::Settings, &session), Navigation::Allowed(Route::Settings));
    }

    #[test]
    fn admin_reaches_admin_routes() {
        let session = Session::new(true, None);
        assert_eq!(
            resolve(Route::AdminTasks, &session),
            Navigation::Allowed(Route::AdminTasks)
        );
    }

    #[test]
    fn root_lands_on_home() {
        let session = Session::default();
        assert_eq!(resolve(Route::Root, &session).route(), Route::Home);
    }

    #[test]
    fn admin_subviews_go_back_to_menu() {
        assert_eq!(Route::AdminUsers.parent(), Some(Route::AdminTools));
        assert_eq!(Route::Table.parent(), None);
    }
}
