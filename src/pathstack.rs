//! Directory-frame stack from root to current directory.
//!
//! Frames are only ever popped from the top and never aliased, so exclusive
//! ownership per frame suffices: each frame owns its parent outright
//! instead of sharing it through a reference-counted pointer.

use crate::dirframe::DirectoryFrame;

struct Frame {
    dir: DirectoryFrame,
    parent: Option<Box<Frame>>,
}

pub struct PathStack {
    top: Box<Frame>,
}

impl PathStack {
    pub fn new(root: DirectoryFrame) -> Self {
        Self {
            top: Box::new(Frame {
                dir: root,
                parent: None,
            }),
        }
    }

    pub fn current(&self) -> &DirectoryFrame {
        &self.top.dir
    }

    pub fn current_mut(&mut self) -> &mut DirectoryFrame {
        &mut self.top.dir
    }

    pub fn is_root(&self) -> bool {
        self.top.parent.is_none()
    }

    pub fn push(&mut self, dir: DirectoryFrame) {
        let old_top = std::mem::replace(
            &mut self.top,
            Box::new(Frame {
                dir,
                parent: None,
            }),
        );
        self.top.parent = Some(old_top);
    }

    /// Pops the top frame. A pop at the root is a no-op and returns `false`.
    pub fn pop(&mut self) -> bool {
        if self.top.parent.is_none() {
            return false;
        }
        let parent = self.top.parent.take().unwrap();
        self.top = parent;
        true
    }

    /// Display names from root to current, excluding the root itself
    /// (whose name is never part of the printed path).
    pub fn path_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        let mut frame: &Frame = &self.top;
        loop {
            match &frame.parent {
                Some(parent) => {
                    names.push(frame.dir.display_name.clone());
                    frame = parent;
                }
                None => break,
            }
        }
        names.reverse();
        names
    }
}
