mod mm1_tests;
