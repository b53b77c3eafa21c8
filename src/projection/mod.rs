pub mod projection_helper;

pub mod filter_list;
pub mod map_list;
pub mod map_singleton;

pub use {
    filter_list::{FilteredList, Predicate},
    map_list::{MappedList, Transformation},
};
