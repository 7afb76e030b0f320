diesel::table! {
    meals (id) {
        id -> Integer,
        meal -> Text,
        cuisine -> Text,
        price -> Double,
        difficulty -> Text,
        battles -> Integer,
        wins -> Integer,
        deleted -> Bool,
    }
}
