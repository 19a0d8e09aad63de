pub mod analog;
pub mod clock;
pub mod console;
pub mod led;
pub mod pcf8523;
pub mod storage;
