// src/core/itinerary.rs — Trip requests, itinerary summaries, prompt rendering

use chrono::{DateTime, NaiveDate, Utc};
use minijinja::{context, Environment};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::infra::errors::TripValidationError;

/// Interests offered by the trip form.
pub const KNOWN_INTERESTS: &[&str] = &[
    "Food",
    "Museums",
    "Nature",
    "Nightlife",
    "Shopping",
    "Adventure",
    "Culture",
    "Beach",
];

/// Interests preselected on a fresh form.
pub const DEFAULT_INTERESTS: &[&str] = &["Food", "Nature"];

const ITINERARY_TEMPLATE: &str = "\
Create a detailed day-by-day travel itinerary for this trip.

From: {{ origin }}
To: {{ destination }}
Dates: {{ start_date }} to {{ end_date }}
Interests: {{ interests | join(\", \") }}
Pace: {{ pace }}

Structure the itinerary with:
- A breakdown for every day
- Morning, afternoon and evening activities
- A short explanation for each activity
- Recommendations that match the selected interests

Keep the answer clear and easy to read.";

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum Pace {
    Relaxed,
    #[default]
    Normal,
    Tight,
}

impl Pace {
    pub const ALL: [Pace; 3] = [Pace::Relaxed, Pace::Normal, Pace::Tight];

    pub fn as_str(&self) -> &'static str {
        match self {
            Pace::Relaxed => "Relaxed",
            Pace::Normal => "Normal",
            Pace::Tight => "Tight",
        }
    }
}

impl fmt::Display for Pace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Pace {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "relaxed" => Ok(Pace::Relaxed),
            "normal" => Ok(Pace::Normal),
            "tight" => Ok(Pace::Tight),
            other => Err(format!("unknown pace '{other}' (relaxed, normal, tight)")),
        }
    }
}

/// Raw trip form input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripRequest {
    pub origin: String,
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub pace: Pace,
}

impl TripRequest {
    /// Check the form before anything leaves the process.
    pub fn validate(&self) -> Result<(), TripValidationError> {
        if self.origin.trim().is_empty() || self.destination.trim().is_empty() {
            return Err(TripValidationError::MissingLocation);
        }
        if self.end_date <= self.start_date {
            return Err(TripValidationError::EndNotAfterStart);
        }
        Ok(())
    }

    /// Interests with blanks and repeats removed, first occurrence kept.
    pub fn normalized_interests(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::with_capacity(self.interests.len());
        for interest in &self.interests {
            let interest = interest.trim();
            if !interest.is_empty() && !out.iter().any(|i| i == interest) {
                out.push(interest.to_string());
            }
        }
        out
    }

    pub fn metadata(&self) -> ItineraryMetadata {
        ItineraryMetadata {
            origin: self.origin.trim().to_string(),
            destination: self.destination.trim().to_string(),
            start_date: self.start_date.format("%Y-%m-%d").to_string(),
            end_date: self.end_date.format("%Y-%m-%d").to_string(),
            interests: self.normalized_interests(),
            pace: self.pace,
        }
    }

    /// The single user message sent to the model for this trip.
    pub fn render_prompt(&self) -> anyhow::Result<String> {
        let meta = self.metadata();
        let mut env = Environment::new();
        env.set_undefined_behavior(minijinja::UndefinedBehavior::Strict);
        env.add_template("itinerary", ITINERARY_TEMPLATE)?;
        let rendered = env.get_template("itinerary")?.render(context! {
            origin => meta.origin,
            destination => meta.destination,
            start_date => meta.start_date,
            end_date => meta.end_date,
            interests => meta.interests,
            pace => meta.pace.as_str(),
        })?;
        Ok(rendered)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ItineraryMetadata {
    pub origin: String,
    pub destination: String,
    pub start_date: String,
    pub end_date: String,
    pub interests: Vec<String>,
    pub pace: Pace,
}

/// A generated itinerary and the trip it was generated for.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ItinerarySummary {
    pub content: String,
    pub metadata: ItineraryMetadata,
}

/// An itinerary as read back from the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SavedItinerary {
    pub summary: ItinerarySummary,
    pub created_at: DateTime<Utc>,
}
