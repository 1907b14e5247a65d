// Models module
// Data structures for intervals, grids, selection and editor settings

pub mod grid;
pub mod interval;
pub mod selection;
pub mod settings;
