//! Argument synthesis.
//!
//! Maps each [`ParamKind`] to a generator. This table is the harness's only
//! coupling to the semantics of the list contract.

use std::cmp::Ordering;

use crate::config::HarnessConfig;
use crate::list::Element;
use crate::operation::{Arg, ParamKind};
use crate::oracle::Divergence;
use crate::rng::DeterministicRng;

/// Build one argument of `kind` for a container currently holding
/// `current_size` elements.
///
/// # Errors
///
/// [`Divergence::UnsupportedParameter`] for kinds with no generator.
pub fn synthesize(
    kind: ParamKind,
    current_size: usize,
    rng: &mut DeterministicRng,
    config: &HarnessConfig,
) -> Result<Arg, Divergence> {
    let arg = match kind {
        ParamKind::Index => Arg::Index(rng.next_index(current_size)),
        ParamKind::Element | ParamKind::Object => Arg::Element(rng.next_i32()),
        ParamKind::Collection => {
            let len = rng.next_index(current_size);
            Arg::Collection((0..len).map(|_| rng.next_i32()).collect())
        }
        ParamKind::Comparator => Arg::Comparator(natural_order),
        ParamKind::UnaryOperator => Arg::Transform(increment),
        ParamKind::ObjectArray => Arg::Array(vec![None; rng.next_index(config.max_array_len)]),
        ParamKind::Unsupported(name) => {
            return Err(Divergence::UnsupportedParameter {
                kind: name.to_string(),
            });
        }
    };
    Ok(arg)
}

/// Synthesize every parameter of an operation, left to right.
///
/// # Errors
///
/// Stops at the first unsupported kind.
pub fn synthesize_all(
    params: &[ParamKind],
    current_size: usize,
    rng: &mut DeterministicRng,
    config: &HarnessConfig,
) -> Result<Vec<Arg>, Divergence> {
    params
        .iter()
        .map(|kind| synthesize(*kind, current_size, rng, config))
        .collect()
}

fn natural_order(a: &Element, b: &Element) -> Ordering {
    a.cmp(b)
}

const fn increment(value: Element) -> Element {
    value.wrapping_add(1)
}
