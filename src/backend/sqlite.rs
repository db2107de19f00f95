use async_trait::async_trait;
use rusqlite::types::Type;
use rusqlite::{params, OptionalExtension, Row};
use tokio::sync::broadcast;

use super::live::LiveFeed;
use super::{new_key, now_timestamp, Collection, RepositoryError, RestaurantRepository};
use crate::db::models::{
    ContactInquiry, GalleryImage, InquiryStatus, MenuDraft, MenuItem, NewGalleryImage,
    NewInquiry, NewOrder, NewReservation, Order, OrderItem, OrderStatus, OrderType, Reservation,
    ReservationStatus, Status,
};
use crate::state::DbPool;

const MENU_COLUMNS: &str = "id, name, description, price, category, image, is_veg, is_available";
const RESERVATION_COLUMNS: &str =
    "id, name, email, phone, date, time, guests, special_request, status, created_at";
const ORDER_COLUMNS: &str = "id, customer_name, customer_phone, customer_email, address, items, \
     total_amount, order_type, status, created_at, delivery_time, special_instructions";
const INQUIRY_COLUMNS: &str = "id, name, email, phone, message, status, created_at";
const GALLERY_COLUMNS: &str = "id, url, name, category, uploaded_at";

/// SQLite-backed repository. Every successful write is published on the live feed.
pub struct SqliteRepository {
    pool: DbPool,
    feed: LiveFeed,
}

impl SqliteRepository {
    pub fn new(pool: DbPool) -> Self {
        Self {
            pool,
            feed: LiveFeed::new(),
        }
    }

    fn snapshot<T>(
        &self,
        sql: &str,
        map: fn(&Row<'_>) -> rusqlite::Result<T>,
    ) -> Result<Vec<T>, RepositoryError> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(sql)?;
        let records = stmt.query_map([], map)?.collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }
}

/// Sort records by an RFC 3339 timestamp, newest first.
///
/// Unparseable timestamps sort after every valid one.
pub fn sort_newest_first<T>(records: &mut [T], timestamp: impl Fn(&T) -> &str) {
    records.sort_by_cached_key(|record| {
        std::cmp::Reverse(
            chrono::DateTime::parse_from_rfc3339(timestamp(record))
                .map(|dt| dt.timestamp_millis())
                .unwrap_or(i64::MIN),
        )
    });
}

fn menu_from_row(row: &Row<'_>) -> rusqlite::Result<MenuItem> {
    Ok(MenuItem {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        price: row.get(3)?,
        category: row.get(4)?,
        image: row.get(5)?,
        is_veg: row.get(6)?,
        is_available: row.get(7)?,
    })
}

fn reservation_from_row(row: &Row<'_>) -> rusqlite::Result<Reservation> {
    Ok(Reservation {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        phone: row.get(3)?,
        date: row.get(4)?,
        time: row.get(5)?,
        guests: row.get(6)?,
        special_request: row.get(7)?,
        status: ReservationStatus::from_stored(&row.get::<_, String>(8)?),
        created_at: row.get(9)?,
    })
}

fn order_from_row(row: &Row<'_>) -> rusqlite::Result<Order> {
    let items_json: String = row.get(5)?;
    let items: Vec<OrderItem> = serde_json::from_str(&items_json)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(e)))?;
    Ok(Order {
        id: row.get(0)?,
        customer_name: row.get(1)?,
        customer_phone: row.get(2)?,
        customer_email: row.get(3)?,
        address: row.get(4)?,
        items,
        total_amount: row.get(6)?,
        order_type: OrderType::from_stored(&row.get::<_, String>(7)?),
        status: OrderStatus::from_stored(&row.get::<_, String>(8)?),
        created_at: row.get(9)?,
        delivery_time: row.get(10)?,
        special_instructions: row.get(11)?,
    })
}

fn inquiry_from_row(row: &Row<'_>) -> rusqlite::Result<ContactInquiry> {
    Ok(ContactInquiry {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        phone: row.get(3)?,
        message: row.get(4)?,
        status: InquiryStatus::from_stored(&row.get::<_, String>(5)?),
        created_at: row.get(6)?,
    })
}

fn gallery_from_row(row: &Row<'_>) -> rusqlite::Result<GalleryImage> {
    Ok(GalleryImage {
        id: row.get(0)?,
        url: row.get(1)?,
        name: row.get(2)?,
        category: row.get(3)?,
        uploaded_at: row.get(4)?,
    })
}

#[async_trait]
impl RestaurantRepository for SqliteRepository {
    async fn menu_snapshot(&self) -> Result<Vec<MenuItem>, RepositoryError> {
        self.snapshot(
            &format!("SELECT {} FROM menu ORDER BY position, rowid", MENU_COLUMNS),
            menu_from_row,
        )
    }

    async fn menu_item(&self, id: &str) -> Result<Option<MenuItem>, RepositoryError> {
        let conn = self.pool.get()?;
        let item = conn
            .query_row(
                &format!("SELECT {} FROM menu WHERE id = ?1", MENU_COLUMNS),
                params![id],
                menu_from_row,
            )
            .optional()?;
        Ok(item)
    }

    async fn create_menu_item(&self, draft: &MenuDraft) -> Result<MenuItem, RepositoryError> {
        let id = new_key();
        {
            let conn = self.pool.get()?;
            conn.execute(
                "INSERT INTO menu (id, name, description, price, category, image, is_veg, is_available, position)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, (SELECT COALESCE(MAX(position), 0) + 1 FROM menu))",
                params![
                    id,
                    draft.name,
                    draft.description,
                    draft.price,
                    draft.category,
                    draft.image,
                    draft.is_veg,
                    draft.is_available,
                ],
            )?;
        }
        self.feed.publish(Collection::Menu);

        Ok(MenuItem {
            id,
            name: draft.name.clone(),
            description: draft.description.clone(),
            price: draft.price,
            category: draft.category.clone(),
            image: draft.image.clone(),
            is_veg: draft.is_veg,
            is_available: draft.is_available,
        })
    }

    async fn replace_menu_item(
        &self,
        id: &str,
        draft: &MenuDraft,
    ) -> Result<bool, RepositoryError> {
        let rows = {
            let conn = self.pool.get()?;
            conn.execute(
                "UPDATE menu SET name = ?2, description = ?3, price = ?4, category = ?5,
                        image = ?6, is_veg = ?7, is_available = ?8
                 WHERE id = ?1",
                params![
                    id,
                    draft.name,
                    draft.description,
                    draft.price,
                    draft.category,
                    draft.image,
                    draft.is_veg,
                    draft.is_available,
                ],
            )?
        };
        if rows > 0 {
            self.feed.publish(Collection::Menu);
        }
        Ok(rows > 0)
    }

    async fn reservations_snapshot(&self) -> Result<Vec<Reservation>, RepositoryError> {
        let mut records = self.snapshot(
            &format!("SELECT {} FROM reservations", RESERVATION_COLUMNS),
            reservation_from_row,
        )?;
        sort_newest_first(&mut records, |r| r.created_at.as_str());
        Ok(records)
    }

    async fn create_reservation(
        &self,
        reservation: &NewReservation,
    ) -> Result<Reservation, RepositoryError> {
        let record = Reservation {
            id: new_key(),
            name: reservation.name.clone(),
            email: reservation.email.clone(),
            phone: reservation.phone.clone(),
            date: reservation.date.clone(),
            time: reservation.time.clone(),
            guests: reservation.guests,
            special_request: reservation.special_request.clone(),
            status: ReservationStatus::Pending,
            created_at: now_timestamp(),
        };
        {
            let conn = self.pool.get()?;
            conn.execute(
                &format!(
                    "INSERT INTO reservations ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                    RESERVATION_COLUMNS
                ),
                params![
                    record.id,
                    record.name,
                    record.email,
                    record.phone,
                    record.date,
                    record.time,
                    record.guests,
                    record.special_request,
                    record.status.as_str(),
                    record.created_at,
                ],
            )?;
        }
        self.feed.publish(Collection::Reservations);
        Ok(record)
    }

    async fn orders_snapshot(&self) -> Result<Vec<Order>, RepositoryError> {
        let mut records = self.snapshot(
            &format!("SELECT {} FROM orders", ORDER_COLUMNS),
            order_from_row,
        )?;
        sort_newest_first(&mut records, |o| o.created_at.as_str());
        Ok(records)
    }

    async fn create_order(&self, order: &NewOrder) -> Result<Order, RepositoryError> {
        let record = Order {
            id: new_key(),
            customer_name: order.customer_name.clone(),
            customer_phone: order.customer_phone.clone(),
            customer_email: order.customer_email.clone(),
            address: order.address.clone(),
            items: order.items.clone(),
            total_amount: order.total_amount,
            order_type: order.order_type,
            status: OrderStatus::Pending,
            created_at: now_timestamp(),
            delivery_time: order.delivery_time.clone(),
            special_instructions: order.special_instructions.clone(),
        };
        let items_json = serde_json::to_string(&record.items)?;
        {
            let conn = self.pool.get()?;
            conn.execute(
                &format!(
                    "INSERT INTO orders ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
                    ORDER_COLUMNS
                ),
                params![
                    record.id,
                    record.customer_name,
                    record.customer_phone,
                    record.customer_email,
                    record.address,
                    items_json,
                    record.total_amount,
                    record.order_type.as_str(),
                    record.status.as_str(),
                    record.created_at,
                    record.delivery_time,
                    record.special_instructions,
                ],
            )?;
        }
        self.feed.publish(Collection::Orders);
        Ok(record)
    }

    async fn inquiries_snapshot(&self) -> Result<Vec<ContactInquiry>, RepositoryError> {
        let mut records = self.snapshot(
            &format!("SELECT {} FROM inquiries", INQUIRY_COLUMNS),
            inquiry_from_row,
        )?;
        sort_newest_first(&mut records, |i| i.created_at.as_str());
        Ok(records)
    }

    async fn create_inquiry(
        &self,
        inquiry: &NewInquiry,
    ) -> Result<ContactInquiry, RepositoryError> {
        let record = ContactInquiry {
            id: new_key(),
            name: inquiry.name.clone(),
            email: inquiry.email.clone(),
            phone: inquiry.phone.clone(),
            message: inquiry.message.clone(),
            status: InquiryStatus::Unread,
            created_at: now_timestamp(),
        };
        {
            let conn = self.pool.get()?;
            conn.execute(
                &format!(
                    "INSERT INTO inquiries ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                    INQUIRY_COLUMNS
                ),
                params![
                    record.id,
                    record.name,
                    record.email,
                    record.phone,
                    record.message,
                    record.status.as_str(),
                    record.created_at,
                ],
            )?;
        }
        self.feed.publish(Collection::Inquiries);
        Ok(record)
    }

    async fn gallery_snapshot(&self) -> Result<Vec<GalleryImage>, RepositoryError> {
        let mut records = self.snapshot(
            &format!("SELECT {} FROM gallery", GALLERY_COLUMNS),
            gallery_from_row,
        )?;
        sort_newest_first(&mut records, |g| g.uploaded_at.as_str());
        Ok(records)
    }

    async fn gallery_image(&self, id: &str) -> Result<Option<GalleryImage>, RepositoryError> {
        let conn = self.pool.get()?;
        let image = conn
            .query_row(
                &format!("SELECT {} FROM gallery WHERE id = ?1", GALLERY_COLUMNS),
                params![id],
                gallery_from_row,
            )
            .optional()?;
        Ok(image)
    }

    async fn create_gallery_image(
        &self,
        image: &NewGalleryImage,
    ) -> Result<GalleryImage, RepositoryError> {
        let record = GalleryImage {
            id: new_key(),
            url: image.url.clone(),
            name: image.name.clone(),
            category: image.category.clone(),
            uploaded_at: now_timestamp(),
        };
        {
            let conn = self.pool.get()?;
            conn.execute(
                &format!(
                    "INSERT INTO gallery ({}) VALUES (?1, ?2, ?3, ?4, ?5)",
                    GALLERY_COLUMNS
                ),
                params![
                    record.id,
                    record.url,
                    record.name,
                    record.category,
                    record.uploaded_at,
                ],
            )?;
        }
        self.feed.publish(Collection::Gallery);
        Ok(record)
    }

    async fn update_status(
        &self,
        collection: Collection,
        id: &str,
        status: &str,
    ) -> Result<bool, RepositoryError> {
        if !collection.has_status() {
            return Err(RepositoryError::NoStatusField(collection));
        }
        let rows = {
            let conn = self.pool.get()?;
            conn.execute(
                &format!("UPDATE {} SET status = ?2 WHERE id = ?1", collection.path()),
                params![id, status],
            )?
        };
        if rows > 0 {
            tracing::info!("{}/{}/status = {}", collection, id, status);
            self.feed.publish(collection);
        }
        Ok(rows > 0)
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<bool, RepositoryError> {
        let rows = {
            let conn = self.pool.get()?;
            conn.execute(
                &format!("DELETE FROM {} WHERE id = ?1", collection.path()),
                params![id],
            )?
        };
        if rows > 0 {
            tracing::info!("Deleted {}/{}", collection, id);
            self.feed.publish(collection);
        }
        Ok(rows > 0)
    }

    async fn count(&self, collection: Collection) -> Result<i64, RepositoryError> {
        let conn = self.pool.get()?;
        let count = conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", collection.path()),
            [],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    fn subscribe(&self) -> broadcast::Receiver<Collection> {
        self.feed.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_newest_first_orders_by_instant_not_text() {
        let mut stamps = vec![
            "2026-10-18T23:00:00.000Z",
            "garbage",
            "2026-10-19T05:00:00.000+05:30",
            "2026-10-19T01:00:00.000Z",
        ];
        sort_newest_first(&mut stamps, |s| *s);
        assert_eq!(
            stamps,
            [
                "2026-10-19T01:00:00.000Z",
                "2026-10-19T05:00:00.000+05:30",
                "2026-10-18T23:00:00.000Z",
                "garbage",
            ]
        );
    }
}
