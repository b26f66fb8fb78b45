mod expr;
mod roll;
mod scan;
