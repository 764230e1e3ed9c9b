pub mod container;
pub mod controller;
pub mod fields;
pub mod validation;

pub use container::{Alert, FormInput, FormState, Status};
pub use controller::{FormController, FormView, Preview};
pub use fields::{Field, FieldError, FieldKind};
