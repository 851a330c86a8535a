pub mod enquiry;
