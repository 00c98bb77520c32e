pub mod sacjd;
