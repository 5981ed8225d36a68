use std::fmt;
use std::ops::{Index, IndexMut};
use std::str::FromStr;

use serde_derive::{Deserialize, Serialize};

use crate::error::Error;

/// Trash category assigned by the upstream tracker
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Label {
    #[serde(rename = "bottles", alias = "bottle")]
    Bottle,
    #[serde(rename = "fragments", alias = "fragment")]
    Fragment,
    #[serde(rename = "others", alias = "other")]
    Other,
}

impl Label {
    pub const COUNT: usize = 3;

    /// HUD order, top to bottom
    pub const ALL: [Label; Label::COUNT] = [Label::Bottle, Label::Fragment, Label::Other];

    #[inline(always)]
    pub fn index(self) -> usize {
        match self {
            Label::Bottle => 0,
            Label::Fragment => 1,
            Label::Other => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Label::Bottle => "bottles",
            Label::Fragment => "fragments",
            Label::Other => "others",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Label {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bottles" | "bottle" => Ok(Label::Bottle),
            "fragments" | "fragment" => Ok(Label::Fragment),
            "others" | "other" => Ok(Label::Other),
            _ => Err(Error::invalid(format!("unknown label `{}`", s))),
        }
    }
}

/// Per-label running totals
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Counts([u32; Label::COUNT]);

impl Counts {
    #[inline]
    pub fn get(&self, label: Label) -> u32 {
        self.0[label.index()]
    }

    /// Copy of `self` with one more `label`
    #[inline]
    pub fn incremented(mut self, label: Label) -> Self {
        self[label] += 1;
        self
    }

    pub fn total(&self) -> u32 {
        self.0.iter().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Label, u32)> + '_ {
        Label::ALL.iter().map(move |&l| (l, self[l]))
    }
}

impl Index<Label> for Counts {
    type Output = u32;

    #[inline]
    fn index(&self, label: Label) -> &u32 {
        &self.0[label.index()]
    }
}

impl IndexMut<Label> for Counts {
    #[inline]
    fn index_mut(&mut self, label: Label) -> &mut u32 {
        &mut self.0[label.index()]
    }
}

impl From<[u32; Label::COUNT]> for Counts {
    fn from(v: [u32; Label::COUNT]) -> Self {
        Counts(v)
    }
}
