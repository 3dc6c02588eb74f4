pub mod kolkata_date;
