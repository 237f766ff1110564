
#[cfg(test)]
mod case_create_tests;

#[cfg(test)]
mod case_update_tests;



#[cfg(test)]
mod case_list_tests;



#[cfg(test)]
mod storage_tests;
