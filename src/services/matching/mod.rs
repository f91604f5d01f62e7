pub mod highlight;
pub mod matcher;
pub mod model;
pub mod normalize;
pub mod placeholder;
