pub mod category;
pub mod category_dish;
pub mod dish;
pub mod order;
pub mod order_dish;
pub mod user;

pub use category::Entity as Category;
pub use category_dish::Entity as CategoryDish;
pub use dish::Entity as Dish;
pub use order::Entity as Order;
pub use order_dish::Entity as OrderDish;
pub use user::Entity as User;

pub type CategoryModel = category::Model;
pub type DishModel = dish::Model;
pub type OrderModel = order::Model;
pub type UserModel = user::Model;
