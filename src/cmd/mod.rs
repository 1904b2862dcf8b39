pub mod fromjson;
pub mod info;
pub mod tojson;
pub mod util;
