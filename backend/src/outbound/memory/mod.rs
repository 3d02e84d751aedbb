//! Process-local store implementing every repository port.
//!
//! Used when no database is configured and by the integration tests. All
//! tables live behind one mutex, so each port call is atomic and cascading
//! deletes match the PostgreSQL adapters.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;

use crate::domain::ports::{
    CarImagePersistenceError, CarImageRepository, CarPersistenceError, CarRepository,
    FavoritePersistenceError, FavoriteRepository, MessagePersistenceError, MessageRepository,
    UserPersistenceError, UserRepository,
};
use crate::domain::{
    Car, CarDeletionReport, CarId, CarImage, CarSearch, Favorite, FavoriteWithCar, ImageId,
    Message, MessageId, MessageStats, NewCar, NewCarImage, NewMessage, NewUser, Role, User,
    UserAccount, UserDeletionReport, UserId,
};

#[derive(Default)]
struct Tables {
    users: BTreeMap<i32, UserAccount>,
    cars: BTreeMap<i32, Car>,
    images: BTreeMap<i32, CarImage>,
    favorites: BTreeMap<i32, Favorite>,
    messages: BTreeMap<i32, Message>,
    last_id: i32,
}

impl Tables {
    /// Ids are unique across tables, which keeps them strictly increasing
    /// within each one.
    fn next_id(&mut self) -> i32 {
        self.last_id += 1;
        self.last_id
    }
}

/// In-memory implementation of the car, image, user, favourite and message
/// repositories.
#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn count_of(count: usize) -> u64 {
    u64::try_from(count).unwrap_or(u64::MAX)
}

#[async_trait]
impl CarRepository for InMemoryStore {
    async fn list_all(&self) -> Result<Vec<Car>, CarPersistenceError> {
        Ok(self.tables().cars.values().cloned().collect())
    }

    async fn search(&self, filters: &CarSearch) -> Result<Vec<Car>, CarPersistenceError> {
        Ok(self
            .tables()
            .cars
            .values()
            .filter(|car| filters.matches(car))
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: CarId) -> Result<Option<Car>, CarPersistenceError> {
        Ok(self.tables().cars.get(&id.get()).cloned())
    }

    async fn insert(&self, car: &NewCar) -> Result<Car, CarPersistenceError> {
        let mut tables = self.tables();
        let id = tables.next_id();
        let now = Utc::now();
        let stored = Car {
            id: CarId::new(id),
            make: car.make.clone(),
            model: car.model.clone(),
            year: car.year,
            mileage: car.mileage,
            price: car.price,
            fuel_type: car.fuel_type.clone(),
            transmission: car.transmission.clone(),
            body_type: car.body_type.clone(),
            image_url: None,
            available: car.available,
            created_at: now,
            updated_at: now,
        };
        tables.cars.insert(id, stored.clone());
        Ok(stored)
    }

    async fn update(&self, car: &Car) -> Result<Option<Car>, CarPersistenceError> {
        let mut tables = self.tables();
        Ok(tables.cars.get_mut(&car.id.get()).map(|slot| {
            let image_url = slot.image_url.take();
            *slot = Car {
                image_url,
                ..car.clone()
            };
            slot.clone()
        }))
    }

    async fn set_image_url(
        &self,
        id: CarId,
        image_url: Option<String>,
    ) -> Result<(), CarPersistenceError> {
        if let Some(car) = self.tables().cars.get_mut(&id.get()) {
            car.image_url = image_url;
            car.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn delete_cascade(
        &self,
        id: CarId,
    ) -> Result<Option<CarDeletionReport>, CarPersistenceError> {
        let mut tables = self.tables();
        if tables.cars.remove(&id.get()).is_none() {
            return Ok(None);
        }

        let mut images: Vec<CarImage> = tables
            .images
            .values()
            .filter(|image| image.car_id == id)
            .cloned()
            .collect();
        images.sort_by(CarImage::display_cmp);
        tables.images.retain(|_, image| image.car_id != id);

        let before = tables.favorites.len();
        tables.favorites.retain(|_, favorite| favorite.car_id != id);
        let favorites_removed = count_of(before - tables.favorites.len());

        Ok(Some(CarDeletionReport {
            image_urls: images.into_iter().map(|image| image.url).collect(),
            favorites_removed,
        }))
    }
}

#[async_trait]
impl CarImageRepository for InMemoryStore {
    async fn list_for_car(&self, car_id: CarId) -> Result<Vec<CarImage>, CarImagePersistenceError> {
        let mut images: Vec<CarImage> = self
            .tables()
            .images
            .values()
            .filter(|image| image.car_id == car_id)
            .cloned()
            .collect();
        images.sort_by(CarImage::display_cmp);
        Ok(images)
    }

    async fn find(
        &self,
        car_id: CarId,
        image_id: ImageId,
    ) -> Result<Option<CarImage>, CarImagePersistenceError> {
        Ok(self
            .tables()
            .images
            .get(&image_id.get())
            .filter(|image| image.car_id == car_id)
            .cloned())
    }

    async fn insert_many(
        &self,
        images: &[NewCarImage],
    ) -> Result<Vec<CarImage>, CarImagePersistenceError> {
        let mut tables = self.tables();
        if let Some(orphan) = images
            .iter()
            .find(|image| !tables.cars.contains_key(&image.car_id.get()))
        {
            debug!(car_id = %orphan.car_id, "image insert for a missing car");
            return Err(CarImagePersistenceError::missing_car());
        }

        let now = Utc::now();
        let mut stored = Vec::with_capacity(images.len());
        for image in images {
            let id = tables.next_id();
            let record = CarImage {
                id: ImageId::new(id),
                car_id: image.car_id,
                url: image.url.clone(),
                caption: None,
                is_primary: image.is_primary,
                sort_order: image.sort_order,
                created_at: now,
            };
            tables.images.insert(id, record.clone());
            stored.push(record);
        }
        Ok(stored)
    }

    async fn update(&self, image: &CarImage) -> Result<CarImage, CarImagePersistenceError> {
        let mut tables = self.tables();
        let slot = tables
            .images
            .get_mut(&image.id.get())
            .ok_or_else(|| CarImagePersistenceError::query("record not found"))?;
        slot.caption.clone_from(&image.caption);
        slot.is_primary = image.is_primary;
        slot.sort_order = image.sort_order;
        Ok(slot.clone())
    }

    async fn clear_primary(&self, car_id: CarId) -> Result<(), CarImagePersistenceError> {
        self.tables()
            .images
            .values_mut()
            .filter(|image| image.car_id == car_id)
            .for_each(|image| image.is_primary = false);
        Ok(())
    }

    async fn delete(&self, image_id: ImageId) -> Result<bool, CarImagePersistenceError> {
        Ok(self.tables().images.remove(&image_id.get()).is_some())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn insert(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let mut tables = self.tables();
        if tables
            .users
            .values()
            .any(|account| account.user.email == user.email)
        {
            return Err(UserPersistenceError::duplicate_email(user.email.to_string()));
        }
        let id = tables.next_id();
        let now = Utc::now();
        let account = UserAccount {
            user: User {
                id: UserId::new(id),
                email: user.email.clone(),
                name: user.name.clone(),
                role: user.role,
                created_at: now,
                updated_at: now,
            },
            password_hash: user.password_hash.clone(),
        };
        let created = account.user.clone();
        tables.users.insert(id, account);
        Ok(created)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>, UserPersistenceError> {
        let wanted = email.to_lowercase();
        Ok(self
            .tables()
            .users
            .values()
            .find(|account| AsRef::<str>::as_ref(&account.user.email) == wanted)
            .cloned())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self
            .tables()
            .users
            .get(&id.get())
            .map(|account| account.user.clone()))
    }

    async fn find_many(&self, ids: &[UserId]) -> Result<Vec<User>, UserPersistenceError> {
        let tables = self.tables();
        Ok(ids
            .iter()
            .filter_map(|id| tables.users.get(&id.get()))
            .map(|account| account.user.clone())
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<User>, UserPersistenceError> {
        Ok(self
            .tables()
            .users
            .values()
            .map(|account| account.user.clone())
            .collect())
    }

    async fn update_role(
        &self,
        id: UserId,
        role: Role,
    ) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.tables().users.get_mut(&id.get()).map(|account| {
            account.user.role = role;
            account.user.updated_at = Utc::now();
            account.user.clone()
        }))
    }

    async fn delete_cascade(
        &self,
        id: UserId,
    ) -> Result<Option<UserDeletionReport>, UserPersistenceError> {
        let mut tables = self.tables();
        if tables.users.remove(&id.get()).is_none() {
            return Ok(None);
        }

        let messages_before = tables.messages.len();
        tables
            .messages
            .retain(|_, message| message.sender_id != id && message.receiver_id != id);
        let favorites_before = tables.favorites.len();
        tables.favorites.retain(|_, favorite| favorite.user_id != id);

        Ok(Some(UserDeletionReport {
            messages_removed: count_of(messages_before - tables.messages.len()),
            favorites_removed: count_of(favorites_before - tables.favorites.len()),
        }))
    }
}

#[async_trait]
impl FavoriteRepository for InMemoryStore {
    async fn add(&self, user_id: UserId, car_id: CarId) -> Result<Favorite, FavoritePersistenceError> {
        let mut tables = self.tables();
        if let Some(existing) = tables
            .favorites
            .values()
            .find(|favorite| favorite.user_id == user_id && favorite.car_id == car_id)
        {
            return Ok(existing.clone());
        }
        if !tables.cars.contains_key(&car_id.get()) {
            return Err(FavoritePersistenceError::missing_car());
        }
        let id = tables.next_id();
        let favorite = Favorite {
            id,
            user_id,
            car_id,
            created_at: Utc::now(),
        };
        tables.favorites.insert(id, favorite.clone());
        Ok(favorite)
    }

    async fn list_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<FavoriteWithCar>, FavoritePersistenceError> {
        let tables = self.tables();
        let mut entries: Vec<FavoriteWithCar> = tables
            .favorites
            .values()
            .filter(|favorite| favorite.user_id == user_id)
            .filter_map(|favorite| {
                tables
                    .cars
                    .get(&favorite.car_id.get())
                    .map(|car| FavoriteWithCar {
                        id: favorite.id,
                        created_at: favorite.created_at,
                        car: car.clone(),
                    })
            })
            .collect();
        entries.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(entries)
    }

    async fn remove(&self, user_id: UserId, car_id: CarId) -> Result<bool, FavoritePersistenceError> {
        let mut tables = self.tables();
        let before = tables.favorites.len();
        tables
            .favorites
            .retain(|_, favorite| !(favorite.user_id == user_id && favorite.car_id == car_id));
        Ok(tables.favorites.len() < before)
    }
}

#[async_trait]
impl MessageRepository for InMemoryStore {
    async fn insert(&self, message: &NewMessage) -> Result<Message, MessagePersistenceError> {
        let mut tables = self.tables();
        let id = tables.next_id();
        let stored = Message {
            id: MessageId::new(id),
            content: message.content.clone(),
            sender_id: message.sender_id,
            receiver_id: message.receiver_id,
            is_read: false,
            created_at: Utc::now(),
        };
        tables.messages.insert(id, stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: MessageId) -> Result<Option<Message>, MessagePersistenceError> {
        Ok(self.tables().messages.get(&id.get()).cloned())
    }

    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Message>, MessagePersistenceError> {
        let mut found: Vec<Message> = self
            .tables()
            .messages
            .values()
            .filter(|message| message.sender_id == user_id || message.receiver_id == user_id)
            .cloned()
            .collect();
        crate::domain::sort_newest_first(&mut found, |message| (message.created_at, message.id));
        Ok(found)
    }

    async fn mark_read(&self, id: MessageId) -> Result<Option<Message>, MessagePersistenceError> {
        Ok(self.tables().messages.get_mut(&id.get()).map(|message| {
            message.is_read = true;
            message.clone()
        }))
    }

    async fn received_stats(&self, user_id: UserId) -> Result<MessageStats, MessagePersistenceError> {
        let tables = self.tables();
        let (read, unread): (Vec<&Message>, Vec<&Message>) = tables
            .messages
            .values()
            .filter(|message| message.receiver_id == user_id)
            .partition(|message| message.is_read);
        Ok(MessageStats {
            read_count: count_of(read.len()),
            unread_count: count_of(unread.len()),
        })
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
