diesel::table! {
    // The table has no key on disk; diesel needs one declared.
    attendance (student_id, date) {
        student_id -> Integer,
        date -> Text,
        time -> Text,
    }
}

diesel::table! {
    students (id) {
        id -> Integer,
        name -> Text,
        email -> Text,
    }
}

diesel::joinable!(attendance -> students (student_id));

diesel::allow_tables_to_appear_in_same_query!(
    attendance,
    students,
);
