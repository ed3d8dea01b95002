//! Pure projection from [`AgentState`] to what the page should show.

use crate::format::format_timestamp;
use crate::state::{AgentState, Timestamp};

pub const RUNNING_LABEL: &str = "Agent Running";
pub const STOPPED_LABEL: &str = "Agent Stopped";
pub const LAST_UPDATE_PREFIX: &str = "Last update: ";

const RUNNING_ICON: &str = "fas fa-circle text-success me-1";
const STOPPED_ICON: &str = "fas fa-circle text-danger me-1";
const RUNNING_BADGE: &str = "bg-success";
const STOPPED_BADGE: &str = "bg-danger";

/// Navbar status indicator and controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavbarView {
    pub label: &'static str,
    pub icon_class: &'static str,
    pub start_visible: bool,
    pub stop_visible: bool,
    /// `None` leaves the current text in place.
    pub last_update_text: Option<String>,
}

/// Status widget present on the dashboard page only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardView {
    pub badge_class: &'static str,
    pub stale_badge_class: &'static str,
    pub badge_text: &'static str,
    pub start_visible: bool,
    pub stop_visible: bool,
    pub last_update_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusView {
    pub navbar: NavbarView,
    pub dashboard: DashboardView,
}

/// Project `state` using the default local-time formatter.
pub fn render_status(state: &AgentState) -> StatusView {
    render_status_with(state, format_timestamp)
}

/// Project `state`, formatting the last-update time with `fmt`.
pub fn render_status_with(state: &AgentState, fmt: impl Fn(&Timestamp) -> String) -> StatusView {
    let running = state.running;
    let formatted = state.last_update.as_ref().map(fmt);

    let navbar = NavbarView {
        label: if running { RUNNING_LABEL } else { STOPPED_LABEL },
        icon_class: if running { RUNNING_ICON } else { STOPPED_ICON },
        start_visible: !running,
        stop_visible: running,
        last_update_text: formatted
            .as_ref()
            .map(|text| format!("{LAST_UPDATE_PREFIX}{text}")),
    };

    let (badge_class, stale_badge_class) = if running {
        (RUNNING_BADGE, STOPPED_BADGE)
    } else {
        (STOPPED_BADGE, RUNNING_BADGE)
    };
    let dashboard = DashboardView {
        badge_class,
        stale_badge_class,
        badge_text: if running { "Running" } else { "Stopped" },
        start_visible: !running,
        stop_visible: running,
        last_update_text: formatted,
    };

    StatusView { navbar, dashboard }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::format::format_timestamp_in;
    use crate::test_helpers::{make_timestamp, running_state};

    fn utc(ts: &Timestamp) -> String {
        format_timestamp_in(ts, &Utc)
    }

    #[test]
    fn stopped_state_shows_start_button() {
        let view = render_status_with(&AgentState::default(), utc);
        assert_eq!(view.navbar.label, "Agent Stopped");
        assert!(view.navbar.icon_class.contains("text-danger"));
        assert!(view.navbar.start_visible);
        assert!(!view.navbar.stop_visible);
        assert_eq!(view.navbar.last_update_text, None);
        assert_eq!(view.dashboard.badge_class, "bg-danger");
        assert_eq!(view.dashboard.stale_badge_class, "bg-success");
        assert_eq!(view.dashboard.badge_text, "Stopped");
        assert!(view.dashboard.start_visible);
        assert!(!view.dashboard.stop_visible);
    }

    #[test]
    fn running_state_shows_stop_button() {
        let view = render_status_with(&running_state(5), utc);
        assert_eq!(view.navbar.label, "Agent Running");
        assert!(view.navbar.icon_class.contains("text-success"));
        assert!(!view.navbar.start_visible);
        assert!(view.navbar.stop_visible);
        assert_eq!(view.dashboard.badge_class, "bg-success");
        assert_eq!(view.dashboard.badge_text, "Running");
    }

    #[test]
    fn last_update_text_is_prefixed_in_navbar_only() {
        let state = AgentState {
            running: false,
            last_update: Some(make_timestamp(42)),
        };
        let view = render_status_with(&state, utc);
        assert_eq!(
            view.navbar.last_update_text.as_deref(),
            Some("Last update: 2026-01-01 00:00:42")
        );
        assert_eq!(
            view.dashboard.last_update_text.as_deref(),
            Some("2026-01-01 00:00:42")
        );
    }

    #[test]
    fn equal_states_render_equal_views() {
        let a = running_state(7);
        let b = running_state(7);
        assert_eq!(render_status(&a), render_status(&b));
        assert_eq!(render_status_with(&a, utc), render_status_with(&a, utc));
    }
}
