use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::BoardError;

/// Detailed project lifecycle status, as stored by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DetailedStatus {
    Pending,
    Approved,
    InProgress,
    Review,
    Completed,
    OnHold,
    Cancelled,
}

impl DetailedStatus {
    pub const ALL: [DetailedStatus; 7] = [
        Self::Pending,
        Self::Approved,
        Self::InProgress,
        Self::Review,
        Self::Completed,
        Self::OnHold,
        Self::Cancelled,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::InProgress => "in-progress",
            Self::Review => "review",
            Self::Completed => "completed",
            Self::OnHold => "on-hold",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for DetailedStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DetailedStatus {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "in-progress" => Ok(Self::InProgress),
            "review" => Ok(Self::Review),
            "completed" => Ok(Self::Completed),
            "on-hold" => Ok(Self::OnHold),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(BoardError::InvalidStatus {
                value: s.to_string(),
            }),
        }
    }
}

/// One of the three fixed visual lanes of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Column {
    Pending,
    InProgress,
    Completed,
}

impl Column {
    /// Render order, left to right.
    pub const ALL: [Column; 3] = [Self::Pending, Self::InProgress, Self::Completed];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
        }
    }

    /// Slot of this column in `Column::ALL`.
    pub const fn index(self) -> usize {
        match self {
            Self::Pending => 0,
            Self::InProgress => 1,
            Self::Completed => 2,
        }
    }
}

impl std::fmt::Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Column {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "in-progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            _ => Err(BoardError::InvalidColumn {
                value: s.to_string(),
            }),
        }
    }
}

/// The `(status, progress)` pair a card is forced to when dropped into a
/// column it did not start in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalStatus {
    pub status: DetailedStatus,
    pub progress: u8,
}

/// One project as shown on the board.
///
/// Fields other than `id`, `display_status` and `progress` are opaque to the
/// engine and carried through unchanged in `metadata`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    #[serde(alias = "displayStatus", alias = "status")]
    pub display_status: DetailedStatus,
    #[serde(default)]
    pub progress: u8,
    #[serde(flatten)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl Card {
    pub const MAX_PROGRESS: u8 = 100;

    pub fn new(id: impl Into<String>, display_status: DetailedStatus, progress: u8) -> Self {
        Self {
            id: id.into(),
            display_status,
            progress,
            metadata: serde_json::Map::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Human label for the card, falling back to its id.
    pub fn name(&self) -> &str {
        self.metadata
            .get("name")
            .and_then(|v| v.as_str())
            .unwrap_or(&self.id)
    }

    pub fn validate(&self) -> Result<(), BoardError> {
        if self.progress > Self::MAX_PROGRESS {
            return Err(BoardError::InvalidProgress {
                card_id: self.id.clone(),
                value: self.progress,
            });
        }
        Ok(())
    }
}

// Snapshot view types

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardView {
    pub columns: Vec<ColumnView>,
}

impl BoardView {
    pub fn column(&self, column: Column) -> &ColumnView {
        &self.columns[column.index()]
    }

    /// Card ids of one column, in render order.
    pub fn ids(&self, column: Column) -> Vec<&str> {
        self.column(column)
            .cards
            .iter()
            .map(|c| c.id.as_str())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnView {
    pub name: Column,
    pub cards: Vec<Card>,
}
