pub mod rx8025t;
