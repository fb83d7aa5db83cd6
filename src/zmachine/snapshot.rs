//! Machine state snapshots
use std::fmt;

/// A frozen copy of the mutable machine state.
///
/// Snapshots copy on construction and alias nothing with the live machine:
/// the dynamic memory prefix, the live stack cells, the frame bookkeeping,
/// and the address of the suspended save instruction's post-argument byte.
/// Memory above the dynamic limit is never captured; it is immutable after
/// load.  The external storage format is the embedder's concern.
#[derive(Clone, Eq, PartialEq)]
pub struct Snapshot {
    /// Dynamic memory contents
    dynamic: Vec<u8>,
    /// Live stack cells
    cells: Vec<u16>,
    /// Base of the current frame
    frame_ptr: usize,
    /// Number of live frames
    frame_count: usize,
    /// Address of the save instruction's store or branch byte
    pc: usize,
}

impl fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Snapshot: {} dynamic bytes, {} stack cells, {} frames, pc ${:06x}",
            self.dynamic.len(),
            self.cells.len(),
            self.frame_count,
            self.pc
        )
    }
}

impl Snapshot {
    /// Constructor.  Both buffers are copied.
    ///
    /// # Arguments
    /// * `dynamic` - Dynamic memory contents
    /// * `cells` - Live stack cells
    /// * `frame_ptr` - Base of the current frame
    /// * `frame_count` - Number of live frames
    /// * `pc` - Address of the save instruction's store or branch byte
    pub fn new(
        dynamic: &[u8],
        cells: &[u16],
        frame_ptr: usize,
        frame_count: usize,
        pc: usize,
    ) -> Snapshot {
        Snapshot {
            dynamic: dynamic.to_vec(),
            cells: cells.to_vec(),
            frame_ptr,
            frame_count,
            pc,
        }
    }

    pub fn dynamic(&self) -> &[u8] {
        &self.dynamic
    }

    pub fn cells(&self) -> &[u16] {
        &self.cells
    }

    pub fn frame_ptr(&self) -> usize {
        self.frame_ptr
    }

    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    pub fn pc(&self) -> usize {
        self.pc
    }
}
