mod page;
mod view_model;

pub use page::PackageDetails;
pub use view_model::PackageDetailsVm;
