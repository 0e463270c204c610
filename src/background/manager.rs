//! Ownership of the current background image and in-flight loads

use super::image::BackgroundImage;

/// Identifies one load request; only the most recent one may apply
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct LoadTicket(u64);

/// Result of delivering a decode to the manager
#[derive(Debug)]
pub enum LoadOutcome<'a> {
    /// The image is now the current background
    Applied(&'a BackgroundImage),
    /// A newer request was issued after this one; the decode was dropped
    Stale,
    /// Decoding failed; the previous background is kept
    Failed,
}

/// Holds the background image and tracks which load request is current
#[derive(Debug, Default)]
pub struct BackgroundImageManager {
    current: Option<BackgroundImage>,
    issued: u64,
    pending: Option<LoadTicket>,
}

impl BackgroundImageManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&BackgroundImage> {
        self.current.as_ref()
    }

    /// Start a load; any earlier pending request becomes stale
    pub fn begin_load(&mut self) -> LoadTicket {
        self.issued += 1;
        let ticket = LoadTicket(self.issued);
        if let Some(previous) = self.pending.replace(ticket) {
            log::debug!("Load {:?} superseded by {:?}", previous, ticket);
        }
        ticket
    }

    /// Deliver the decode result for `ticket`
    pub fn complete(
        &mut self,
        ticket: LoadTicket,
        result: anyhow::Result<BackgroundImage>,
    ) -> LoadOutcome<'_> {
        if self.pending != Some(ticket) {
            log::debug!("Ignoring stale image load {:?}", ticket);
            return LoadOutcome::Stale;
        }
        self.pending = None;
        match result {
            Ok(image) => LoadOutcome::Applied(self.current.insert(image)),
            Err(err) => {
                log::warn!("Failed to load background image: {:#}", err);
                LoadOutcome::Failed
            }
        }
    }

    /// Drop the current image; pending loads stay valid
    pub fn clear(&mut self) -> bool {
        self.current.take().is_some()
    }
}
