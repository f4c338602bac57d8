//! Document sections and the fixed wizard step order.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Top-level section of the wizard document.
///
/// The serialized key (`warp_range`, `etp`, ...) is the first segment of every
/// [`crate::FieldPath`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    WarpRange,
    IndigoControl,
    ShadeFinish,
    Etp,
    Footprints,
    Safety,
    Handover,
}

impl Section {
    pub const ALL: [Section; 7] = [
        Section::WarpRange,
        Section::IndigoControl,
        Section::ShadeFinish,
        Section::Etp,
        Section::Footprints,
        Section::Safety,
        Section::Handover,
    ];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Section::WarpRange => "warp_range",
            Section::IndigoControl => "indigo_control",
            Section::ShadeFinish => "shade_finish",
            Section::Etp => "etp",
            Section::Footprints => "footprints",
            Section::Safety => "safety",
            Section::Handover => "handover",
        }
    }

    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|section| section.key() == key)
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One screen of the wizard. Steps are totally ordered by [`Step::ALL`] and map
/// one-to-one onto document sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Step {
    #[default]
    WarpRange,
    IndigoControl,
    ShadeFinish,
    Etp,
    Footprints,
    Safety,
    Handover,
}

impl Step {
    pub const ALL: [Step; 7] = [
        Step::WarpRange,
        Step::IndigoControl,
        Step::ShadeFinish,
        Step::Etp,
        Step::Footprints,
        Step::Safety,
        Step::Handover,
    ];

    pub const FIRST: Step = Step::WarpRange;
    pub const LAST: Step = Step::Handover;

    /// Zero-based position in the fixed order.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Step::WarpRange => 0,
            Step::IndigoControl => 1,
            Step::ShadeFinish => 2,
            Step::Etp => 3,
            Step::Footprints => 4,
            Step::Safety => 5,
            Step::Handover => 6,
        }
    }

    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// The following step, or `None` at the last step.
    #[must_use]
    pub fn next(self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    /// The preceding step, or `None` at the first step.
    #[must_use]
    pub fn prev(self) -> Option<Self> {
        self.index().checked_sub(1).and_then(Self::from_index)
    }

    #[must_use]
    pub const fn section(self) -> Section {
        match self {
            Step::WarpRange => Section::WarpRange,
            Step::IndigoControl => Section::IndigoControl,
            Step::ShadeFinish => Section::ShadeFinish,
            Step::Etp => Section::Etp,
            Step::Footprints => Section::Footprints,
            Step::Safety => Section::Safety,
            Step::Handover => Section::Handover,
        }
    }

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Step::WarpRange => "Warp range",
            Step::IndigoControl => "Indigo control",
            Step::ShadeFinish => "Shade & finish",
            Step::Etp => "Effluent treatment",
            Step::Footprints => "Footprints",
            Step::Safety => "Safety",
            Step::Handover => "Handover",
        }
    }
}
