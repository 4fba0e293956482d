pub mod quotation_print;
