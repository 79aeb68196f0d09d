// Copyright 2026 the Tiltframe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Background image picking.
//!
//! Each [`ImagePicker::request`] reads one file on its own thread and sends
//! the outcome back over an `mpsc` channel. Requests are never cancelled. The
//! reconcile thread calls [`ImagePicker::poll`] once per cycle; when several
//! picks have completed since the last poll, the one that completed last wins.

use std::io;
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

use crate::picked::PickedImage;

/// A completed pick.
#[derive(Debug)]
pub enum PickResult {
    /// The file was read. It has not been decoded yet.
    Picked(PickedImage),
    /// The file could not be read.
    Failed {
        /// The requested path.
        path: PathBuf,
        /// Why it could not be read.
        error: io::Error,
    },
}

impl PickResult {
    /// Returns the picked image, if the pick succeeded.
    #[must_use]
    pub fn into_image(self) -> Option<PickedImage> {
        match self {
            Self::Picked(image) => Some(image),
            Self::Failed { .. } => None,
        }
    }
}

/// Loads image files off the reconcile thread.
#[derive(Debug)]
pub struct ImagePicker {
    sender: mpsc::Sender<PickResult>,
    receiver: mpsc::Receiver<PickResult>,
    in_flight: usize,
}

impl Default for ImagePicker {
    fn default() -> Self {
        Self::new()
    }
}

impl ImagePicker {
    /// Creates a picker with nothing in flight.
    #[must_use]
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            sender,
            receiver,
            in_flight: 0,
        }
    }

    /// Starts reading `path` in the background.
    pub fn request(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        let sender = self.sender.clone();
        self.in_flight += 1;
        thread::spawn(move || {
            let result = match PickedImage::open(&path) {
                Ok(image) => PickResult::Picked(image),
                Err(error) => PickResult::Failed { path, error },
            };
            // The picker may have been dropped; nobody is waiting then.
            let _ = sender.send(result);
        });
    }

    /// Number of requests that have not been observed by `poll` or `wait`.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Returns the most recently completed pick, without blocking.
    ///
    /// Earlier picks completed since the previous poll are superseded and
    /// dropped.
    pub fn poll(&mut self) -> Option<PickResult> {
        let mut latest = None;
        while let Ok(result) = self.receiver.try_recv() {
            self.in_flight -= 1;
            latest = Some(result);
        }
        latest
    }

    /// Blocks until every in-flight request completes and returns the last
    /// one to finish.
    pub fn wait(&mut self) -> Option<PickResult> {
        let mut latest = None;
        while self.in_flight > 0 {
            let Ok(result) = self.receiver.recv() else {
                break;
            };
            self.in_flight -= 1;
            latest = Some(result);
        }
        latest
    }
}
