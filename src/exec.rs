//! The top-level driver: scans candidate start offsets and pulls
//! candidates from the root yielder.

use crate::api::Pattern;
use crate::backtrack::{yielder_for, Cx};
use crate::cursor::{rune_width_at, Cursor, Output, SubMatch};
use crate::error::Error;

/// Find the leftmost match at or after `start`, returning the flat
/// submatch index pairs. Under longest semantics every candidate at the
/// matching offset is drained and the first of the greatest consumed
/// length wins.
pub(crate) fn find_at(re: &Pattern, text: &[u8], start: usize) -> Result<Option<Vec<isize>>, Error> {
    if start > text.len() {
        return Ok(None);
    }
    let mut pos = start;
    loop {
        pos = match re.start.find(text, pos) {
            Some(pos) => pos,
            None => return Ok(None),
        };
        if let Some(m) = try_match_at(re, text, pos)? {
            return Ok(Some(m));
        }
        if re.anchored || pos >= text.len() {
            return Ok(None);
        }
        pos += rune_width_at(text, pos);
    }
}

fn try_match_at(re: &Pattern, text: &[u8], pos: usize) -> Result<Option<Vec<isize>>, Error> {
    let mut cx = Cx {
        funcs: &re.funcs,
        group_count: re.group_count,
        steps: re.step_limit,
    };
    let mut root = yielder_for(&re.root, Cursor::new(text, pos, SubMatch::default()));
    let mut best: Option<Output> = None;
    while let Some(output) = root.resume(&mut cx)? {
        let improved = match &best {
            Some(best) => output.len > best.len,
            None => true,
        };
        if improved {
            best = Some(output);
        }
        if !re.longest {
            break;
        }
    }
    Ok(best.map(|output| submatch_indices(re, pos, &output)))
}

fn submatch_indices(re: &Pattern, pos: usize, output: &Output) -> Vec<isize> {
    let mut m = Vec::with_capacity((re.group_count as usize + 1) * 2);
    m.push(pos as isize);
    m.push((pos + output.len) as isize);
    for index in 1..=re.group_count {
        match output.sub.get_index(index) {
            Some(span) => {
                m.push(span.start as isize);
                m.push(span.end as isize);
            }
            None => {
                m.push(-1);
                m.push(-1);
            }
        }
    }
    m
}
