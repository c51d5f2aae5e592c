/*!
Shared types: currently just the error kinds ([err]).
*/

pub mod err;
