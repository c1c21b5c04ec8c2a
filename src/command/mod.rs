mod subscribe;

pub use subscribe::subscribe;
