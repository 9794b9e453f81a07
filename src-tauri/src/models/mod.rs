pub mod defaults;
pub mod scale;
pub mod scorecard;
pub mod view;
