//! Bounded Per-Sensor History Windows
//!
//! ## Overview
//!
//! Each sensor gets a fixed-capacity, append-only window of recent
//! (label, temperature, humidity) points used for charting and windowed
//! calculations. The window is a FIFO ring: once full, every push evicts
//! exactly the oldest point, atomically with the insertion, so the length
//! can never exceed capacity even transiently.
//!
//! ## Design notes
//!
//! - Capacity is a const generic, so the storage is a plain array with no
//!   heap involvement and the eviction index math compiles down to a
//!   wrapping increment.
//! - One [`SeriesPoint`] carries *both* sub-series. The historical bug
//!   class where the temperature and humidity arrays drift out of step is
//!   unrepresentable here; a missing sub-value travels as `f32::NAN`.
//! - Windows are looked up by sensor id in [`SeriesTable`], an explicit
//!   bounded map. Nothing assumes sensor ids are small dense integers
//!   matching chart positions.

use heapless::FnvIndexMap;

use crate::constants::{MAX_TRACKED_SENSORS, SERIES_WINDOW_CAPACITY};
use crate::errors::{IngestError, IngestResult};
use crate::payload::Label;

/// One charted point: elapsed-time label plus both sub-values
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SeriesPoint {
    /// Elapsed-time label in `m:ss` form
    pub label: Label,
    /// Temperature in Celsius, `NaN` when the sub-value was missing
    pub temperature_c: f32,
    /// Relative humidity in percent, `NaN` when the sub-value was missing
    pub humidity_pct: f32,
}

/// Fixed-capacity FIFO window of series points
///
/// ## Invariants
///
/// - `write_pos < N` and `len <= N` at all times
/// - iteration yields points oldest to newest in push order
#[derive(Debug, Clone)]
pub struct SeriesBuffer<const N: usize = SERIES_WINDOW_CAPACITY> {
    /// Ring storage; `None` marks never-written slots
    data: [Option<SeriesPoint>; N],
    /// Next write position, wraps at N
    write_pos: usize,
    /// Number of valid points, saturates at N
    len: usize,
}

impl<const N: usize> SeriesBuffer<N> {
    pub const fn new() -> Self {
        Self {
            data: [None; N],
            write_pos: 0,
            len: 0,
        }
    }

    /// Append one point, evicting the oldest if the window is full
    pub fn push(&mut self, temperature_c: f32, humidity_pct: f32, label: Label) {
        self.data[self.write_pos] = Some(SeriesPoint {
            label,
            temperature_c,
            humidity_pct,
        });
        self.write_pos = (self.write_pos + 1) % N;

        if self.len < N {
            self.len += 1;
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == N
    }

    /// Most recently pushed point
    pub fn last(&self) -> Option<&SeriesPoint> {
        if self.is_empty() {
            return None;
        }

        let idx = if self.write_pos == 0 { N - 1 } else { self.write_pos - 1 };
        self.data[idx].as_ref()
    }

    /// Drop all points, keeping the window registered
    pub fn clear(&mut self) {
        self.write_pos = 0;
        self.len = 0;
    }

    /// Owned copy of the current contents, oldest to newest
    pub fn snapshot(&self) -> heapless::Vec<SeriesPoint, N> {
        self.iter().copied().collect()
    }

    /// Iterate points oldest to newest
    pub fn iter(&self) -> SeriesIter<'_, N> {
        SeriesIter { buffer: self, count: 0 }
    }

    /// Translate a logical index (0 = oldest) to the stored point
    fn get(&self, index: usize) -> Option<&SeriesPoint> {
        if index >= self.len {
            return None;
        }

        let actual = if self.len < N {
            // Not yet wrapped: data starts at slot 0
            index
        } else {
            // Full: oldest point sits at the write position
            (self.write_pos + index) % N
        };

        self.data[actual].as_ref()
    }
}

impl<const N: usize> Default for SeriesBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over window contents, oldest to newest
pub struct SeriesIter<'a, const N: usize> {
    buffer: &'a SeriesBuffer<N>,
    count: usize,
}

impl<'a, const N: usize> Iterator for SeriesIter<'a, N> {
    type Item = &'a SeriesPoint;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.buffer.get(self.count)?;
        self.count += 1;
        Some(item)
    }
}

/// Bounded map of sensor id to history window
///
/// Windows are created lazily on the first reading for an id. The table
/// holds at most [`MAX_TRACKED_SENSORS`] sensors; readings for further ids
/// are rejected as unknown entities (skipped, not fatal). Iteration order
/// is registration order, which keeps snapshots stable.
#[derive(Debug, Clone, Default)]
pub struct SeriesTable<const N: usize = SERIES_WINDOW_CAPACITY> {
    windows: FnvIndexMap<u32, SeriesBuffer<N>, MAX_TRACKED_SENSORS>,
}

impl<const N: usize> SeriesTable<N> {
    pub fn new() -> Self {
        Self {
            windows: FnvIndexMap::new(),
        }
    }

    /// Append a point to the window for `sensor_id`, registering it if new
    pub fn push(
        &mut self,
        sensor_id: u32,
        temperature_c: f32,
        humidity_pct: f32,
        label: Label,
    ) -> IngestResult<()> {
        if let Some(window) = self.windows.get_mut(&sensor_id) {
            window.push(temperature_c, humidity_pct, label);
            return Ok(());
        }

        let mut window = SeriesBuffer::new();
        window.push(temperature_c, humidity_pct, label);
        self.windows
            .insert(sensor_id, window)
            .map_err(|_| IngestError::UnknownSensor { id: sensor_id })?;
        Ok(())
    }

    /// Number of registered sensors
    pub fn sensor_count(&self) -> usize {
        self.windows.len()
    }

    /// Window for one sensor, if registered
    pub fn window(&self, sensor_id: u32) -> Option<&SeriesBuffer<N>> {
        self.windows.get(&sensor_id)
    }

    /// Iterate (sensor id, window) in registration order
    pub fn iter(&self) -> impl Iterator<Item = (u32, &SeriesBuffer<N>)> {
        self.windows.iter().map(|(id, window)| (*id, window))
    }

    /// Reset every window to empty, keeping sensors registered
    pub fn reset(&mut self) {
        for window in self.windows.values_mut() {
            window.clear();
        }
    }
}
