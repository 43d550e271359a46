//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod booked_event;
pub mod booked_participant;
pub mod booking;
pub mod cart;
pub mod cart_item;
pub mod category;
pub mod event;
pub mod event_details;
pub mod event_organiser;
pub mod event_slot;
pub mod lyric_line;
pub mod parent_event;
pub mod participation_constraint;
pub mod recording;
pub mod song;
pub mod temp_participant;
pub mod temp_timeslot;

// Re-export specific types to avoid conflicts
pub use booked_event::{
    Column as BookedEventColumn, Entity as BookedEvent, Model as BookedEventModel,
};
pub use booked_participant::{
    Column as BookedParticipantColumn, Entity as BookedParticipant,
    Model as BookedParticipantModel,
};
pub use booking::{Column as BookingColumn, Entity as Booking, Model as BookingModel};
pub use cart::{Column as CartColumn, Entity as Cart, Model as CartModel};
pub use cart_item::{Column as CartItemColumn, Entity as CartItem, Model as CartItemModel};
pub use category::{Column as CategoryColumn, Entity as Category, Model as CategoryModel};
pub use event::{Column as EventColumn, Entity as Event, Model as EventModel};
pub use event_details::{
    Column as EventDetailsColumn, Entity as EventDetails, Model as EventDetailsModel,
};
pub use event_organiser::{
    Column as EventOrganiserColumn, Entity as EventOrganiser, Model as EventOrganiserModel,
};
pub use event_slot::{Column as EventSlotColumn, Entity as EventSlot, Model as EventSlotModel};
pub use lyric_line::{Column as LyricLineColumn, Entity as LyricLine, Model as LyricLineModel};
pub use parent_event::{
    Column as ParentEventColumn, Entity as ParentEvent, Model as ParentEventModel,
};
pub use participation_constraint::{
    Column as ParticipationConstraintColumn, Entity as ParticipationConstraint,
    Model as ParticipationConstraintModel,
};
pub use recording::{Column as RecordingColumn, Entity as Recording, Model as RecordingModel};
pub use song::{Column as SongColumn, Entity as Song, Model as SongModel};
pub use temp_participant::{
    Column as TempParticipantColumn, Entity as TempParticipant, Model as TempParticipantModel,
};
pub use temp_timeslot::{
    Column as TempTimeslotColumn, Entity as TempTimeslot, Model as TempTimeslotModel,
};
