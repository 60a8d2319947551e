// Copyright 2025 the Pickpath Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dispatcher helper: walk a dispatch sequence and honor stop outcomes.
//!
//! - [`Outcome`] only controls propagation (`Continue` vs `Stop`).
//! - The return value from [`run`] reports where propagation stopped, if it did.
//! - Anything richer, such as "default prevented", lives on the event payload
//!   you pass to [`run`].
//!
//! ## Minimal example
//!
//! ```
//! use pickpath_responder::dispatcher;
//! use pickpath_responder::types::{Dispatch, Outcome, Phase};
//!
//! // container (1) > button (2)
//! let seq: Vec<Dispatch<u32>> = vec![
//!     Dispatch::capture(1),
//!     Dispatch::target(2),
//!     Dispatch::bubble(1),
//! ];
//!
//! // A capture listener on the container swallows the click.
//! let mut seen = Vec::new();
//! let stop_at = dispatcher::run(&seq, &mut seen, |d, seen| {
//!     seen.push((d.phase, d.node));
//!     if d.phase == Phase::Capture && d.node == 1 {
//!         Outcome::Stop
//!     } else {
//!         Outcome::Continue
//!     }
//! });
//!
//! assert_eq!(stop_at.map(|d| d.node), Some(1));
//! assert_eq!(seen, vec![(Phase::Capture, 1)]);
//! ```

use crate::types::{Dispatch, Outcome};

/// Run a handler over a dispatch sequence and honor stop outcomes.
///
/// `seq` is expected in the capture → target → bubble order the
/// [`Router`](crate::router::Router) emits. `event` is a payload carried
/// across handler calls. Returns `None` if every entry was visited, or the
/// entry whose handler returned [`Outcome::Stop`].
pub fn run<'a, K, E>(
    seq: &'a [Dispatch<K>],
    event: &mut E,
    mut handler: impl FnMut(&Dispatch<K>, &mut E) -> Outcome,
) -> Option<&'a Dispatch<K>> {
    for d in seq {
        match handler(d, event) {
            Outcome::Continue => {}
            Outcome::Stop => return Some(d),
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Phase;
    use alloc::vec;
    use alloc::vec::Vec;

    fn mk_seq() -> Vec<Dispatch<u32>> {
        vec![
            Dispatch::capture(1),
            Dispatch::capture(2),
            Dispatch::target(3),
            Dispatch::bubble(2),
            Dispatch::bubble(1),
        ]
    }

    #[test]
    fn continue_through_all() {
        let seq = mk_seq();
        let mut seen: Vec<(Phase, u32)> = Vec::new();
        let stopped = run(&seq, &mut seen, |d, seen| {
            seen.push((d.phase, d.node));
            Outcome::Continue
        });
        assert!(stopped.is_none());
        assert_eq!(seen.len(), seq.len());
    }

    #[test]
    fn stop_in_capture_skips_target_and_bubble() {
        let seq = mk_seq();
        let mut seen: Vec<(Phase, u32)> = Vec::new();
        let stopped = run(&seq, &mut seen, |d, seen| {
            seen.push((d.phase, d.node));
            if d.phase == Phase::Capture && d.node == 2 {
                Outcome::Stop
            } else {
                Outcome::Continue
            }
        });
        let stopped = stopped.unwrap();
        assert_eq!((stopped.phase, stopped.node), (Phase::Capture, 2));
        assert_eq!(seen, vec![(Phase::Capture, 1), (Phase::Capture, 2)]);
    }

    #[test]
    fn stop_in_target_skips_bubble() {
        #[derive(Default)]
        struct Ev {
            handled: bool,
            seen: Vec<(Phase, u32)>,
        }

        let seq = mk_seq();
        let mut ev = Ev::default();
        let stopped = run(&seq, &mut ev, |d, e| {
            e.seen.push((d.phase, d.node));
            if d.phase == Phase::Target {
                e.handled = true;
                Outcome::Stop
            } else {
                Outcome::Continue
            }
        });
        assert_eq!(stopped.map(|d| d.phase), Some(Phase::Target));
        assert!(ev.handled);
        assert_eq!(
            ev.seen,
            vec![(Phase::Capture, 1), (Phase::Capture, 2), (Phase::Target, 3)]
        );
    }
}
