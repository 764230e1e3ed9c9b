pub mod form_page;
pub mod results;

pub use form_page::FormPage;
pub use results::{format_pln, ResultsPage};
