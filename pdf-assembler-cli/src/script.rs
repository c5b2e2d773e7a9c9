//! Page edits given on the command line, replayed as widget events
//!
//! Page numbers always refer to the pages as they were uploaded, so
//! `--order 3,1 --remove 2` means the same thing whatever order the edits
//! are applied in.

use anyhow::{bail, Context, Result};
use pdf_assembler::{Assembler, Origin, RotationAngle};
use std::collections::HashSet;

/// Parse a comma separated list of 1-based page numbers
pub fn parse_page_list(spec: &str) -> Result<Vec<usize>> {
    spec.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            let number: usize = part
                .parse()
                .with_context(|| format!("invalid page number '{part}'"))?;
            if number == 0 {
                bail!("page numbers start at 1");
            }
            Ok(number)
        })
        .collect()
}

/// Parse `PAGE:DEGREES`, e.g. `2:90`
pub fn parse_rotation(spec: &str) -> Result<(usize, RotationAngle)> {
    let (page, degrees) = spec
        .split_once(':')
        .with_context(|| format!("expected PAGE:DEGREES, got '{spec}'"))?;

    let page = match parse_page_list(page)?.as_slice() {
        [page] => *page,
        _ => bail!("expected a single page number in '{spec}'"),
    };
    let degrees: i32 = degrees
        .trim()
        .parse()
        .with_context(|| format!("invalid angle '{degrees}'"))?;

    Ok((page, RotationAngle::from_degrees(degrees)?))
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct EditPlan {
    /// Pages to put first, in this order; the rest keep their relative order
    pub order: Vec<usize>,
    pub remove: Vec<usize>,
    pub rotate: Vec<(usize, RotationAngle)>,
}

impl EditPlan {
    pub fn parse(order: Option<&str>, remove: Option<&str>, rotate: &[String]) -> Result<Self> {
        let order = order.map(parse_page_list).transpose()?.unwrap_or_default();
        let mut seen = HashSet::new();
        if let Some(duplicate) = order.iter().find(|&&number| !seen.insert(number)) {
            bail!("page {duplicate} appears twice in --order");
        }

        Ok(Self {
            order,
            remove: remove.map(parse_page_list).transpose()?.unwrap_or_default(),
            rotate: rotate
                .iter()
                .map(|spec| parse_rotation(spec))
                .collect::<Result<_>>()?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty() && self.remove.is_empty() && self.rotate.is_empty()
    }

    /// Replay the plan as drags, remove clicks and rotations
    ///
    /// Removed pages are only hidden; the caller lets the lifecycle timers
    /// run before finalizing.
    pub fn apply(&self, assembler: &mut Assembler) -> Result<()> {
        let order = resolve(assembler, &self.order)?;
        let remove = resolve(assembler, &self.remove)?;
        let rotate = self
            .rotate
            .iter()
            .map(|&(number, angle)| Ok((origin_of(assembler, number)?, angle)))
            .collect::<Result<Vec<_>>>()?;

        for (slot, origin) in order.into_iter().enumerate() {
            let index = index_of(assembler, origin)?;
            move_page(assembler, index, slot)?;
        }
        for (origin, angle) in rotate {
            let index = index_of(assembler, origin)?;
            assembler.rotate(index, angle)?;
        }
        for origin in remove {
            let index = index_of(assembler, origin)?;
            assembler.remove(index)?;
        }

        Ok(())
    }
}

fn origin_of(assembler: &Assembler, number: usize) -> Result<Origin> {
    let pages = assembler.pages();
    number
        .checked_sub(1)
        .and_then(|index| pages.get(index))
        .map(|page| page.origin)
        .with_context(|| format!("page {number} does not exist ({} pages)", pages.len()))
}

fn resolve(assembler: &Assembler, numbers: &[usize]) -> Result<Vec<Origin>> {
    numbers
        .iter()
        .map(|&number| origin_of(assembler, number))
        .collect()
}

fn index_of(assembler: &Assembler, origin: Origin) -> Result<usize> {
    assembler
        .pages()
        .position_of(origin)
        .with_context(|| format!("page {origin} is gone"))
}

/// Drag the page at `from` so it lands in slot `to`
///
/// The pointer jumps straight to a spot whose midpoint lies between the
/// target slot and its neighbour, which is what a user dropping it there
/// would produce.
fn move_page(assembler: &mut Assembler, from: usize, to: usize) -> Result<()> {
    if from == to {
        return Ok(());
    }

    let layout = assembler.layout();
    let midpoints = layout.midpoints();
    let last = midpoints.len() - 1;
    let target = if to < from {
        match to {
            0 => midpoints[0] - 1.0,
            _ => (midpoints[to - 1] + midpoints[to]) / 2.0,
        }
    } else if to == last {
        midpoints[last] + 1.0
    } else {
        (midpoints[to] + midpoints[to + 1]) / 2.0
    };
    let x = target - layout.dimensions[from].width / 2.0;

    assembler.drag_start(from)?;
    assembler.drag_move(x)?;
    let landed = assembler.drag_end()?;
    if landed != to {
        bail!("page {} landed in slot {} instead of {}", from + 1, landed + 1, to + 1);
    }
    Ok(())
}

/// Let pending reveal and purge transitions run out on the real clock
pub async fn settle(assembler: &mut Assembler) {
    while let Some(wait) = assembler.time_until_next_transition() {
        tokio::time::sleep(wait).await;
        assembler.tick();
    }
}
