/// Image acquisition for clasSCII: decoded files and the built-in default picture.

pub mod image;
