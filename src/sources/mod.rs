pub mod mangahere;
