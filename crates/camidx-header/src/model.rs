//! Recognized camera models and their identifier conventions.

use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Camera sensor models the firmware ships a web UI for.
///
/// Each model owns one array block in `camera_index.h`. The identifiers the
/// firmware looks up at compile time are derived from [`CameraModel::as_str`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CameraModel {
    Ov2640,
    Ov3660,
    Ov5640,
}

impl CameraModel {
    /// All recognized models, in header order.
    pub const ALL: [CameraModel; 3] = [
        CameraModel::Ov2640,
        CameraModel::Ov3660,
        CameraModel::Ov5640,
    ];

    /// Lowercase model name, e.g. `ov2640`.
    pub const fn as_str(self) -> &'static str {
        match self {
            CameraModel::Ov2640 => "ov2640",
            CameraModel::Ov3660 => "ov3660",
            CameraModel::Ov5640 => "ov5640",
        }
    }

    /// Look up a model by exact (case-sensitive) name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == name)
    }

    /// File name referenced by the marker comment (`index_ov2640.html.gz`).
    pub fn gz_file_name(self) -> String {
        format!("index_{}.html.gz", self.as_str())
    }

    /// Editable HTML file name written by extraction (`index_ov2640.html`).
    pub fn html_file_name(self) -> String {
        format!("index_{}.html", self.as_str())
    }

    /// Identifier of the byte array (`index_ov2640_html_gz`).
    pub fn array_ident(self) -> String {
        format!("index_{}_html_gz", self.as_str())
    }

    /// Identifier of the length macro (`index_ov2640_html_gz_len`).
    pub fn len_ident(self) -> String {
        format!("index_{}_html_gz_len", self.as_str())
    }
}

impl fmt::Display for CameraModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for CameraModel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| Error::UnknownModel(s.to_string()))
    }
}
