//! Diesel table definitions for the invitation database.

diesel::table! {
    guests (id) {
        id -> Uuid,
        #[max_length = 100]
        first_name -> Varchar,
        #[max_length = 100]
        last_name -> Varchar,
        #[max_length = 255]
        email -> Varchar,
        rsvp_status -> Nullable<Bool>,
        plus_one -> Bool,
        #[max_length = 200]
        plus_one_name -> Nullable<Varchar>,
        children_count -> Int4,
        children_needs -> Nullable<Text>,
        dietary_reqs -> Nullable<Text>,
        #[max_length = 8]
        language -> Varchar,
        bus_ida -> Bool,
        bus_vuelta -> Bool,
        barco_ida -> Bool,
        barco_vuelta -> Bool,
        preboda -> Bool,
        table_id -> Nullable<Int4>,
        song_request -> Nullable<Text>,
        song_processed -> Bool,
        notes -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    song_suggestions (id) {
        id -> Uuid,
        #[max_length = 200]
        song -> Varchar,
        processed -> Bool,
        guest_id -> Nullable<Uuid>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    rsvp_events (id) {
        id -> Uuid,
        #[max_length = 100]
        event_type -> Varchar,
        rsvp_status -> Nullable<Bool>,
        metadata -> Nullable<Jsonb>,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(song_suggestions -> guests (guest_id));

diesel::allow_tables_to_appear_in_same_query!(guests, rsvp_events, song_suggestions);
