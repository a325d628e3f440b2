pub mod history;
pub mod identify;
pub mod recognition;
pub mod regulation;
