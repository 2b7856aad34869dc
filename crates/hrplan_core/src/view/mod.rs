//! Presentation boundary.
//!
//! # Responsibility
//! - Carry explicit view state (which tab is active) separately from the plan.
//! - Produce presentation-neutral render output for host UIs.
//! - Describe user edits as `EditIntent` values.
//!
//! # Invariants
//! - Rendering never mutates the plan.
//! - View state is owned by the host and passed in on every render.

mod intent;

pub use intent::EditIntent;

use crate::aggregate::{pivot_with, LoadThresholds, PivotResult};
use crate::model::{Axis, Member, Month, PlanDocument, Theme};
use serde::{Deserialize, Serialize};

/// Editor tab.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActiveTab {
    /// Members grouped with their themes.
    #[default]
    MemberToTheme,
    /// Themes grouped with their members.
    ThemeToMember,
    /// Master lists (period, months, themes, members).
    Master,
    /// Raw document text.
    Source,
}

impl ActiveTab {
    pub const ALL: [ActiveTab; 4] = [
        Self::MemberToTheme,
        Self::ThemeToMember,
        Self::Master,
        Self::Source,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::MemberToTheme => "member_to_theme",
            Self::ThemeToMember => "theme_to_member",
            Self::Master => "master",
            Self::Source => "source",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|tab| tab.as_str() == value.trim())
    }

    /// Pivot orientation for pivot tabs, `None` otherwise.
    pub fn primary_axis(self) -> Option<Axis> {
        match self {
            Self::MemberToTheme => Some(Axis::Member),
            Self::ThemeToMember => Some(Axis::Theme),
            Self::Master | Self::Source => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    pub active_tab: ActiveTab,
}

impl ViewState {
    pub fn new(active_tab: ActiveTab) -> Self {
        Self { active_tab }
    }
}

/// Master-list projection for the master tab.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MasterView {
    pub period: Option<String>,
    pub months: Vec<Month>,
    pub themes: Vec<Theme>,
    pub members: Vec<Member>,
}

/// Render output for one tab.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "tab", rename_all = "snake_case")]
pub enum RenderedView {
    Pivot(PivotResult),
    Master(MasterView),
    Source { text: String },
}

/// Renders the tab selected in `state`.
///
/// `raw` is the current document text, shown verbatim on the source tab.
pub fn render(
    doc: &PlanDocument,
    raw: &str,
    state: &ViewState,
    thresholds: LoadThresholds,
) -> RenderedView {
    match state.active_tab {
        ActiveTab::Source => RenderedView::Source {
            text: raw.to_string(),
        },
        ActiveTab::Master => RenderedView::Master(MasterView {
            period: doc.period.clone(),
            months: doc.months.clone(),
            themes: doc.themes.clone(),
            members: doc.members.clone(),
        }),
        ActiveTab::MemberToTheme | ActiveTab::ThemeToMember => {
            let axis = state.active_tab.primary_axis().unwrap_or(Axis::Member);
            RenderedView::Pivot(pivot_with(doc, axis, thresholds))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{render, ActiveTab, RenderedView, ViewState};
    use crate::aggregate::LoadThresholds;
    use crate::model::{Axis, PlanDocument};

    #[test]
    fn tab_names_parse_back() {
        for tab in ActiveTab::ALL {
            assert_eq!(ActiveTab::parse(tab.as_str()), Some(tab));
        }
        assert_eq!(ActiveTab::parse("charts"), None);
    }

    #[test]
    fn render_follows_active_tab() {
        let doc = PlanDocument::default();
        let source = render(
            &doc,
            "raw",
            &ViewState::new(ActiveTab::Source),
            LoadThresholds::default(),
        );
        assert_eq!(
            source,
            RenderedView::Source {
                text: "raw".to_string()
            }
        );

        match render(&doc, "", &ViewState::new(ActiveTab::ThemeToMember), LoadThresholds::default()) {
            RenderedView::Pivot(result) => assert_eq!(result.primary, Axis::Theme),
            other => panic!("expected pivot, got {other:?}"),
        }
    }
}
