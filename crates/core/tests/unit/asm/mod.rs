/// Label table declaration and lookup.
pub mod labels;
