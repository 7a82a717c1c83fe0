//! Side channel for things the user should know about a run besides its result.

use std::fmt::{Display, Formatter};

use wktview_types::CrsId;

use crate::detect::InputFormat;

/// Event reported through a [`Messenger`].
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    /// The input was not WKT and was converted into a polygon in the given system.
    FormatConverted {
        /// Recognized input format.
        format: InputFormat,
        /// System the polygon is in.
        crs: CrsId,
    },
}

impl Display for Notice {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Notice::FormatConverted { format, crs } => {
                write!(f, "Input recognized as {format} and converted to WKT, EPSG:{crs}")
            }
        }
    }
}

/// Receiver of [`Notice`]s.
pub trait Messenger: Send + Sync {
    /// Called for every notice emitted by a run.
    fn notify(&self, notice: &Notice);
}

impl<F: Fn(&Notice) + Send + Sync> Messenger for F {
    fn notify(&self, notice: &Notice) {
        self(notice)
    }
}

/// Messenger writing notices to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogMessenger;

impl Messenger for LogMessenger {
    fn notify(&self, notice: &Notice) {
        log::info!("{notice}");
    }
}
