use std::cell::Cell;
use std::rc::Rc;

use cli_common::{ParseError, ParseErrorKind};

pub const DEFAULT_RECURSION_LIMIT: usize = 64;

#[derive(Debug)]
pub struct RecursionGuard {
    remaining: Rc<Cell<usize>>,
}

impl RecursionGuard {
    pub fn new(max_depth: usize) -> Self {
        RecursionGuard {
            remaining: Rc::new(Cell::new(max_depth)),
        }
    }

    /// Take one level of depth. The level is given back when the returned
    /// `DepthGuard` is dropped.
    pub fn dec(&self, position: usize) -> Result<DepthGuard, ParseError> {
        let remaining = self.remaining.get();
        if remaining == 0 {
            return Err(ParseError::new(
                ParseErrorKind::MaximumRecursionDepthReached,
                position,
            ));
        }

        self.remaining.set(remaining - 1);

        Ok(DepthGuard {
            remaining: Rc::clone(&self.remaining),
        })
    }

    #[cfg(test)]
    pub fn remaining(&self) -> usize {
        self.remaining.get()
    }
}

#[derive(Debug)]
pub struct DepthGuard {
    remaining: Rc<Cell<usize>>,
}

impl Drop for DepthGuard {
    fn drop(&mut self) {
        self.remaining.set(self.remaining.get() + 1);
    }
}

#[cfg(test)]
mod tests {
    use crate::recursion::*;

    #[test]
    fn test_depth_is_restored_on_drop() {
        let guard = RecursionGuard::new(2);

        {
            let _first = guard.dec(0).unwrap();
            let _second = guard.dec(0).unwrap();
            assert_eq!(guard.remaining(), 0);

            let err = guard.dec(9).unwrap_err();
            assert_eq!(err.kind, ParseErrorKind::MaximumRecursionDepthReached);
            assert_eq!(err.position, 9);
        }

        assert_eq!(guard.remaining(), 2);
    }
}
