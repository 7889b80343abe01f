pub mod integral;
pub mod io;
pub mod traits;
pub mod u8;

pub use self::integral::SummedAreaTable;
pub use self::traits::ImageView;
pub use self::u8::ImageU8;
