#[cfg(test)]
mod common;

#[cfg(test)]
mod people_search_tests;

#[cfg(test)]
mod person_save_tests;

#[cfg(test)]
mod certificates_tests;

#[cfg(test)]
mod courses_tests;

#[cfg(test)]
mod backup_tests;

#[cfg(test)]
mod session_tests;

#[cfg(test)]
mod router_tests;
