use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::grid::MonthGrid;
use crate::models::mood::{Mood, MoodEntry};

pub const TRANSPARENT: &str = "transparent";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn neutral_border(self) -> &'static str {
        match self {
            Theme::Light => "#ccc",
            Theme::Dark => "#333",
        }
    }
}

/// Fill for a stored mood symbol; unknown symbols stay transparent.
pub fn mood_color(symbol: &str) -> &'static str {
    Mood::from_symbol(symbol).map_or(TRANSPARENT, Mood::color)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Cell {
    pub date: Option<NaiveDate>,
    pub fill: &'static str,
    pub border: Option<&'static str>,
}

pub fn mood_map(entries: &[MoodEntry]) -> HashMap<NaiveDate, String> {
    entries
        .iter()
        .map(|e| (e.date, e.mood.clone()))
        .collect()
}

pub fn overlay(
    grid: &MonthGrid,
    moods: &HashMap<NaiveDate, String>,
    theme: Theme,
) -> Vec<[Cell; 7]> {
    grid.weeks
        .iter()
        .map(|week| week.map(|slot| cell(slot, moods, theme)))
        .collect()
}

fn cell(slot: Option<NaiveDate>, moods: &HashMap<NaiveDate, String>, theme: Theme) -> Cell {
    match slot {
        None => Cell {
            date: None,
            fill: TRANSPARENT,
            border: None,
        },
        Some(date) => Cell {
            date: Some(date),
            fill: moods.get(&date).map_or(TRANSPARENT, |m| mood_color(m)),
            border: Some(theme.neutral_border()),
        },
    }
}
