//! Unit records: stats, purchase data, talents, picture book, evolve
//! text and the cat aggregate.

pub mod cats;
pub mod enemy;
pub mod evolve_text;
pub mod picture_book;
pub mod slots;
pub mod stats;
pub mod talents;
pub mod unit_buy;

pub use cats::{Cat, Cats, Form, FormType, UnitAnim};
pub use enemy::EnemyStats;
pub use evolve_text::EvolveText;
pub use picture_book::{NyankoPictureBook, PictureBookEntry};
pub use stats::Stats;
pub use talents::{Talent, Talents};
pub use unit_buy::{EvolveItems, GachaRarity, Rarity, UnitBuy, UnitBuyData};
