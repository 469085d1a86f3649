//! Screens, navigation and one-shot notifications.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::error::{Error, InvalidInputError};
use crate::types::{ResourceId, ResourceKind};

/// A screen, addressed by its path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Login,
    Signup,
    Index(ResourceKind),
    Create(ResourceKind),
    Show(ResourceKind, ResourceId),
    Edit(ResourceKind, ResourceId),
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Login => "/login".to_string(),
            Route::Signup => "/signup".to_string(),
            Route::Index(kind) => kind.collection_path(),
            Route::Create(kind) => format!("/{}/create", kind.segment()),
            Route::Show(kind, id) => kind.item_path(*id),
            Route::Edit(kind, id) => format!("{}/edit", kind.item_path(*id)),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

impl FromStr for Route {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || -> Error {
            InvalidInputError::Route {
                value: s.to_string(),
            }
            .into()
        };

        let segments: Vec<&str> = s
            .trim()
            .trim_matches('/')
            .split('/')
            .filter(|seg| !seg.is_empty())
            .collect();

        match segments.as_slice() {
            [] => Ok(Route::Home),
            ["login"] => Ok(Route::Login),
            ["signup"] => Ok(Route::Signup),
            [kind] => Ok(Route::Index(parse_kind(kind).ok_or_else(unknown)?)),
            [kind, "create"] => Ok(Route::Create(parse_kind(kind).ok_or_else(unknown)?)),
            [kind, id] => Ok(Route::Show(
                parse_kind(kind).ok_or_else(unknown)?,
                id.parse().map_err(|_| unknown())?,
            )),
            [kind, id, "edit"] => Ok(Route::Edit(
                parse_kind(kind).ok_or_else(unknown)?,
                id.parse().map_err(|_| unknown())?,
            )),
            _ => Err(unknown()),
        }
    }
}

// Only the exact collection segment is a valid path component.
fn parse_kind(segment: &str) -> Option<ResourceKind> {
    ResourceKind::ALL
        .into_iter()
        .find(|kind| kind.segment() == segment)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashKind {
    Success,
    Error,
}

/// A notification carried to the next screen and shown once.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    #[serde(rename = "type")]
    pub kind: FlashKind,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Error,
            message: message.into(),
        }
    }
}

/// Counter bumped on every navigation.
///
/// A screen takes a [`Ticket`] before starting a request and checks it when
/// the response arrives; a stale ticket means the user has moved on and the
/// result must be dropped.
#[derive(Clone, Debug, Default)]
pub struct ScreenEpoch(Arc<AtomicU64>);

impl ScreenEpoch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ticket(&self) -> Ticket {
        Ticket {
            epoch: self.clone(),
            issued: self.0.load(Ordering::Acquire),
        }
    }

    pub fn advance(&self) {
        self.0.fetch_add(1, Ordering::AcqRel);
    }
}

/// Proof of which screen started a request.
#[derive(Clone, Debug)]
pub struct Ticket {
    epoch: ScreenEpoch,
    issued: u64,
}

impl Ticket {
    /// Whether the screen that took this ticket is still displayed.
    pub fn is_current(&self) -> bool {
        self.epoch.0.load(Ordering::Acquire) == self.issued
    }
}

/// Current screen plus the pending one-shot notification.
#[derive(Debug)]
pub struct Navigator {
    current: Route,
    flash: Option<Flash>,
    epoch: ScreenEpoch,
}

impl Navigator {
    pub fn new(start: Route) -> Self {
        Self {
            current: start,
            flash: None,
            epoch: ScreenEpoch::new(),
        }
    }

    pub fn current(&self) -> Route {
        self.current
    }

    /// Move to `route`, replacing any unread notification with `flash`.
    pub fn navigate(&mut self, route: Route, flash: Option<Flash>) {
        self.current = route;
        self.flash = flash;
        self.epoch.advance();
    }

    /// Queue a notification on the current screen.
    pub fn notify(&mut self, flash: Flash) {
        self.flash = Some(flash);
    }

    /// Take the pending notification. A second call returns `None`.
    pub fn take_flash(&mut self) -> Option<Flash> {
        self.flash.take()
    }

    pub fn ticket(&self) -> Ticket {
        self.epoch.ticket()
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(Route::Home)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn paths_round_trip() {
        let id = ResourceId::new(7).unwrap();
        let routes = [
            Route::Home,
            Route::Login,
            Route::Signup,
            Route::Index(ResourceKind::Doctors),
            Route::Create(ResourceKind::Patients),
            Route::Show(ResourceKind::Appointments, id),
            Route::Edit(ResourceKind::Prescriptions, id),
        ];
        for route in routes {
            assert_eq!(route.path().parse::<Route>().unwrap(), route);
        }
        assert_eq!(Route::Edit(ResourceKind::Diagnoses, id).path(), "/diagnoses/7/edit");
    }

    #[test]
    fn unknown_paths_are_rejected() {
        assert!("/nurses".parse::<Route>().is_err());
        assert!("/doctors/abc".parse::<Route>().is_err());
        assert!("/doctors/0/edit".parse::<Route>().is_err());
        assert!("/doctors/1/edit/more".parse::<Route>().is_err());
    }

    #[test]
    fn flash_is_shown_once() {
        let mut nav = Navigator::default();
        nav.navigate(
            Route::Index(ResourceKind::Doctors),
            Some(Flash::success("Doctor created successfully")),
        );

        assert_eq!(
            nav.take_flash(),
            Some(Flash::success("Doctor created successfully"))
        );
        assert_eq!(nav.take_flash(), None);
    }

    #[test]
    fn navigation_drops_unread_flash() {
        let mut nav = Navigator::default();
        nav.navigate(Route::Login, Some(Flash::error("Please log in")));
        nav.navigate(Route::Home, None);
        assert_eq!(nav.take_flash(), None);
    }

    #[test]
    fn flash_serializes_with_type_field() {
        assert_eq!(
            serde_json::to_value(Flash::error("in use")).unwrap(),
            json!({"type": "error", "message": "in use"})
        );
    }

    #[test]
    fn tickets_go_stale_after_navigation() {
        let mut nav = Navigator::default();
        let ticket = nav.ticket();
        assert!(ticket.is_current());

        nav.navigate(Route::Login, None);
        assert!(!ticket.is_current());
        assert!(nav.ticket().is_current());
    }
}
