// Typed binding of the externally populated `measurement` table.
//
// `station` and `date` are nullable in the Hawaii dataset's DDL. Queries skip
// rows where the column they key on is NULL.

diesel::table! {
    measurement (id) {
        id -> Integer,
        station -> Nullable<Text>,
        date -> Nullable<Text>,
        prcp -> Nullable<Double>,
        tobs -> Nullable<Double>,
    }
}
